pub mod common;

mod recharge_flow;
