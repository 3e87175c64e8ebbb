//! HTTP 层：路由、管理员认证、JWT 与页面渲染

pub mod constants;
pub mod jwt;
pub mod middleware;
pub mod render;
pub mod services;
