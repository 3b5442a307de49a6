// ==========================================
// 集成测试共享组件
// ==========================================

pub mod mock_store;
