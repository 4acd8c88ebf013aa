// src/xml/mod.rs
pub mod element;
pub mod stream;

pub use element::Element;
pub use stream::ElementStream;
