pub mod probe;
pub mod report;
pub mod selector;
pub mod window;
