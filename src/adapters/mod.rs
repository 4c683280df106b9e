pub mod agent_tools;
pub mod connector_tools;
pub mod environment;
pub mod fivetran_client;
pub mod health_handler;
pub mod pagination;
pub mod rmcp_server;
pub mod tool_handler;

#[cfg(test)]
pub(crate) mod test_support;
