use crate::datasource::MonitorDatasource;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct HttpServerState {
    pub name: Arc<String>,
    pub datasource: Arc<MonitorDatasource>,
}
