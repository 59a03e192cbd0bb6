//! 青少年心理健康社区后端
//! 提供令牌签发、Bearer 认证中间件、登录与注册

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;
pub mod telemetry;
