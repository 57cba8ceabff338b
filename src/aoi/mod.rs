pub mod area;
pub mod containment;
pub mod polygon_filter;
pub mod reference;
pub mod report;
pub mod validation;
