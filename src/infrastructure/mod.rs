//! 基础设施层：外部系统交互
//!
//! 提供与外部系统（Gemini、网站后端、日志、HTTP）的交互能力

pub mod llm;
pub mod logger;
pub mod metadata;
pub mod web;
