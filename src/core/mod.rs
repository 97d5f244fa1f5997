pub mod error;
pub mod geometry;
pub mod model;
pub mod pages;
pub mod params;
pub mod warning;
