//! # Derma Core
//!
//! 皮肤病变诊断系统的核心模块，提供基础数据结构、错误定义和演示数据集。

pub mod error;
pub mod fixtures;
pub mod models;

pub use error::{DermaError, Result};
pub use models::*;
