//! 键值存储：按字符串键读写 JSON 值，无事务，后写覆盖先写
//!
//! - **MemoryStore**: 进程内（测试）
//! - **JsonFileStore**: 每个键一个 JSON 文件
//! - **Repository**: 课程 / 学校设置 / 学生名单 / 学生详情的类型化读写

pub mod file;
pub mod memory;
pub mod repository;

use serde_json::Value;

use crate::core::StoreError;

pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use repository::{
    Repository, StudentDetail, StudentDetails, StudentLists, CURRICULUM_KEY, SETTINGS_KEY,
    STUDENT_DETAILS_KEY, STUDENT_LISTS_KEY,
};

/// 持久化存储接口
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;
}
