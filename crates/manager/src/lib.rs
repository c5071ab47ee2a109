//! # `quantdesk-manager` - 应用服务层
//!
//! 组合项目端口，实现项目的读取、局部更新、创建与删除，以及从目录推导项目元数据。

pub mod project;
