// apps/pf_cli/src/commands/mod.rs

//! 子命令实现

pub mod dump;
pub mod info;
pub mod source;
pub mod validate;
