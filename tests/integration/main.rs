mod common;
mod health_test;
mod mcp_protocol_test;
