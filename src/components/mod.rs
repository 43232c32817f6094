pub mod banner;
pub mod bracket;
pub mod theme;
