//! Small engine-wide utilities

mod double_buffered;

pub use double_buffered::DoubleBuffered;
