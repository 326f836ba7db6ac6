pub mod archive;
pub mod codec;
pub mod pipeline;
