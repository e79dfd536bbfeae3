//! External toolchain wrappers
//!
//! Every build step ultimately shells out. The only contract with a wrapped
//! tool is "invoke with arguments, inspect exit code and captured output";
//! these modules hold the argument spellings so target actions stay short.

pub mod archive;
pub mod coverage;
pub mod dotnet;
pub mod git;
pub mod process;
pub mod version;

// Re-export main types
pub use process::ToolCommand;
