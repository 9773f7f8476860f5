mod category;

pub use category::{AttributeOption, AttributeType, Category, CategoryAttribute};
