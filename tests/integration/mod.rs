/// Integration test target
mod habit_flow;
