use super::query::QueryModel;
use crate::error::BridgeError;
use crate::provider::models::{GetMonitorDataRequest, Instance, ProviderDimension};

/// Builds the provider request for a query.
///
/// Returns `Ok(None)` for hidden queries: nothing must be sent to the provider.
/// All the query dimensions go into a single instance filter, in order.
pub fn translate_query(query: &QueryModel) -> Result<Option<GetMonitorDataRequest>, BridgeError> {
    if query.hide {
        return Ok(None);
    }

    if query.service.trim().is_empty() {
        return Err(BridgeError::validation("missing namespace (service)"));
    }
    if query.metric.trim().is_empty() {
        return Err(BridgeError::validation("missing metric name"));
    }

    let (start_time, end_time) = match (query.start_time(), query.end_time()) {
        (Some(start_time), Some(end_time)) => (start_time, end_time),
        _ => return Err(BridgeError::validation("missing time range")),
    };

    Ok(Some(GetMonitorDataRequest {
        namespace: query.service.clone(),
        metric_name: query.metric.clone(),
        period: query.period,
        start_time,
        end_time,
        instances: vec![Instance {
            dimensions: query
                .dimensions
                .iter()
                .map(ProviderDimension::from)
                .collect(),
        }],
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datamodel::query::{Dimension, TimeRange};

    fn cvm_query() -> QueryModel {
        QueryModel {
            service: "QCE/CVM".to_string(),
            region: "ap-shanghai".to_string(),
            metric: "CPUUsage".to_string(),
            period: 300,
            dimensions: vec![
                Dimension::new("InstanceId", "ins-2"),
                Dimension::new("InstanceId", "ins-1"),
                Dimension::new("Zone", "ap-shanghai-2"),
            ],
            time_range: Some(TimeRange::new(1704067200000, 1704070800000)),
            ..Default::default()
        }
    }

    #[test]
    fn test_translate_query() {
        let query = cvm_query();
        let request = translate_query(&query).unwrap().unwrap();

        assert_eq!(request.namespace, "QCE/CVM");
        assert_eq!(request.metric_name, "CPUUsage");
        assert_eq!(request.period, 300);
        assert_eq!(request.start_time, "2024-01-01T00:00:00+00:00");
        assert_eq!(request.end_time, "2024-01-01T01:00:00+00:00");

        // A single instance holding every dimension, order and duplicates preserved
        assert_eq!(request.instances.len(), 1);
        let dimensions: Vec<Dimension> = request.instances[0]
            .dimensions
            .iter()
            .map(|d| Dimension::new(d.name.clone(), d.value.clone()))
            .collect();
        assert_eq!(dimensions, query.dimensions);
    }

    #[test]
    fn test_hidden_query_is_skipped() {
        let query = QueryModel {
            hide: true,
            service: String::new(),
            time_range: None,
            ..cvm_query()
        };
        assert_eq!(translate_query(&query).unwrap(), None);
    }

    #[test]
    fn test_missing_namespace() {
        let query = QueryModel {
            service: "  ".to_string(),
            ..cvm_query()
        };
        assert!(matches!(
            translate_query(&query),
            Err(BridgeError::Validation(_))
        ));
    }

    #[test]
    fn test_missing_metric() {
        let query = QueryModel {
            metric: String::new(),
            ..cvm_query()
        };
        assert!(matches!(
            translate_query(&query),
            Err(BridgeError::Validation(_))
        ));
    }

    #[test]
    fn test_missing_time_range() {
        let query = QueryModel {
            time_range: None,
            ..cvm_query()
        };
        let err = translate_query(&query).unwrap_err();
        assert!(err.to_string().contains("time range"));
    }

    #[test]
    fn test_no_dimensions() {
        let query = QueryModel {
            dimensions: vec![],
            ..cvm_query()
        };
        let request = translate_query(&query).unwrap().unwrap();
        assert_eq!(request.instances, vec![Instance::default()]);
    }
}
