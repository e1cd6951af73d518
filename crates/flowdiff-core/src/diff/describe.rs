//! Text fragments shared by the difference templates

use crate::model::{
    components::{
        DEFAULT_DATA_SIZE_THRESHOLD, DEFAULT_FLOWFILE_EXPIRATION, DEFAULT_LOAD_BALANCE_COMPRESSION,
        DEFAULT_LOAD_BALANCE_STRATEGY, DEFAULT_OBJECT_THRESHOLD,
    },
    bracketed, or_null, ConfigurableExtension, Connection, ParameterContext, Processor,
};

const PARTITION_BY_ATTRIBUTE: &str = "PARTITION_BY_ATTRIBUTE";

pub fn is_multiline(text: &str) -> bool {
    text.contains('\n') || text.contains('\r')
}

/// ``"`a` to `b`"``, or fenced blocks when either side spans several lines
pub fn from_to(from: &str, to: &str) -> String {
    if is_multiline(from) || is_multiline(to) {
        format!("\n```\n{}\n```\nto\n```\n{}\n```", from, to)
    } else {
        format!("`{}` to `{}`", from, to)
    }
}

/// ``"`L` from `S` to `D`"``
pub fn connection_route(connection: &Connection) -> String {
    format!(
        "`{}` from `{}` to `{}`",
        connection.label(),
        connection.source_name(),
        connection.destination_name()
    )
}

pub fn connection_added(connection: &Connection) -> String {
    let mut line = if connection.is_self_loop() {
        format!(
            "- A self-loop connection `{}` has been added on `{}`",
            connection.label(),
            connection.source_name()
        )
    } else {
        format!("- A connection {} has been added", connection_route(connection))
    };

    let settings = non_default_settings(connection);
    if !settings.is_empty() {
        line.push_str(". The connection is configured with ");
        line.push_str(&settings.join(", "));
    }
    line
}

pub fn connection_removed(connection: &Connection) -> String {
    if connection.is_self_loop() {
        format!(
            "- A self-loop connection `{}` has been removed from `{}`",
            connection.label(),
            connection.source_name()
        )
    } else {
        format!("- A connection {} has been removed", connection_route(connection))
    }
}

fn non_default_settings(connection: &Connection) -> Vec<String> {
    let mut settings = Vec::new();

    if connection.load_balance_strategy != DEFAULT_LOAD_BALANCE_STRATEGY {
        let mut lb = format!("load balancing strategy `{}`", connection.load_balance_strategy);
        if connection.load_balance_strategy == PARTITION_BY_ATTRIBUTE {
            lb.push_str(&format!(
                " and partitioning attribute `{}`",
                or_null(connection.partitioning_attribute.as_deref())
            ));
        }
        if connection.load_balance_compression != DEFAULT_LOAD_BALANCE_COMPRESSION {
            lb.push_str(&format!(
                " and load balancing compression `{}`",
                connection.load_balance_compression
            ));
        }
        settings.push(lb);
    }

    if !connection.prioritizers.is_empty() {
        settings.push(format!("prioritizers `{}`", bracketed(&connection.prioritizers)));
    }

    if connection.flow_file_expiration != DEFAULT_FLOWFILE_EXPIRATION {
        settings.push(format!(
            "FlowFile expiration of `{}`",
            connection.flow_file_expiration
        ));
    }

    if connection.back_pressure_data_size_threshold != DEFAULT_DATA_SIZE_THRESHOLD {
        settings.push(format!(
            "backpressure data size threshold of `{}`",
            connection.back_pressure_data_size_threshold
        ));
    }

    if connection.back_pressure_object_threshold != DEFAULT_OBJECT_THRESHOLD {
        settings.push(format!(
            "backpressure object threshold of `{}`",
            connection.back_pressure_object_threshold
        ));
    }

    settings
}

/// Scheduling summary of a newly added processor
pub fn processor_configuration(processor: &Processor) -> String {
    format!(
        "`{}` nodes, `{}` concurrent tasks, `{}ms` run duration, `{}` bulletin level, `{}` (`{}`), `{}` penalty duration, `{}` yield duration",
        or_null(processor.execution_node.as_deref()),
        processor.concurrently_schedulable_task_count,
        or_null(processor.run_duration_millis),
        or_null(processor.bulletin_level.as_deref()),
        or_null(processor.scheduling_strategy.as_deref()),
        or_null(processor.scheduling_period.as_deref()),
        or_null(processor.penalty_duration.as_deref()),
        or_null(processor.yield_duration.as_deref()),
    )
}

/// One ``  - `key` = `value` `` line per property, sensitive values masked
pub fn property_lines(extension: &dyn ConfigurableExtension) -> Vec<String> {
    extension
        .properties()
        .keys()
        .map(|key| format!("  - `{}` = `{}`", key, extension.display_property(key)))
        .collect()
}

/// `{name=value, secret=<Sensitive Value>}` in document order
pub fn parameter_context_summary(context: &ParameterContext) -> String {
    let entries: Vec<String> = context
        .parameters
        .iter()
        .map(|p| format!("{}={}", p.name, p.display_value()))
        .collect();
    format!("{{{}}}", entries.join(", "))
}

/// Suffix describing a newly added parameter's description
pub fn parameter_description_suffix(description: Option<&str>) -> String {
    match description {
        None | Some("") => String::new(),
        Some(d) if is_multiline(d) => format!(" with the description\n```\n{}\n```", d),
        Some(d) => format!(" with the description `{}`", d),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConnectableComponent, Parameter};

    fn endpoint(id: &str, name: &str) -> ConnectableComponent {
        ConnectableComponent {
            id: id.to_string(),
            r#type: "PROCESSOR".to_string(),
            group_id: None,
            name: Some(name.to_string()),
        }
    }

    fn connection(source: ConnectableComponent, destination: ConnectableComponent) -> Connection {
        serde_json::from_value(serde_json::json!({
            "identifier": "c1",
            "source": source,
            "destination": destination,
            "selectedRelationships": ["success"]
        }))
        .unwrap()
    }

    #[test]
    fn test_from_to_inline_and_fenced() {
        assert_eq!(from_to("a", "b"), "`a` to `b`");
        assert_eq!(from_to("a\nb", "c"), "\n```\na\nb\n```\nto\n```\nc\n```");
    }

    #[test]
    fn test_connection_added_with_defaults() {
        let c = connection(endpoint("a", "A"), endpoint("b", "B"));
        assert_eq!(
            connection_added(&c),
            "- A connection `[success]` from `A` to `B` has been added"
        );
    }

    #[test]
    fn test_connection_added_lists_non_default_settings() {
        let mut c = connection(endpoint("a", "A"), endpoint("b", "B"));
        c.load_balance_strategy = "PARTITION_BY_ATTRIBUTE".to_string();
        c.partitioning_attribute = Some("tenant".to_string());
        c.back_pressure_object_threshold = 500;
        assert_eq!(
            connection_added(&c),
            "- A connection `[success]` from `A` to `B` has been added. The connection is configured with \
             load balancing strategy `PARTITION_BY_ATTRIBUTE` and partitioning attribute `tenant`, \
             backpressure object threshold of `500`"
        );
    }

    #[test]
    fn test_self_loop_wording() {
        let c = connection(endpoint("a", "A"), endpoint("a", "A"));
        assert_eq!(
            connection_added(&c),
            "- A self-loop connection `[success]` has been added on `A`"
        );
        assert_eq!(
            connection_removed(&c),
            "- A self-loop connection `[success]` has been removed from `A`"
        );
    }

    #[test]
    fn test_parameter_context_summary_masks() {
        let ctx = ParameterContext {
            name: "ctx".to_string(),
            parameters: vec![
                Parameter {
                    name: "url".to_string(),
                    value: Some("http://x".to_string()),
                    ..Default::default()
                },
                Parameter {
                    name: "token".to_string(),
                    value: Some("s3cr3t".to_string()),
                    sensitive: true,
                    description: None,
                },
            ],
            ..Default::default()
        };
        assert_eq!(
            parameter_context_summary(&ctx),
            "{url=http://x, token=<Sensitive Value>}"
        );
    }

    #[test]
    fn test_parameter_description_suffix() {
        assert_eq!(parameter_description_suffix(None), "");
        assert_eq!(parameter_description_suffix(Some("")), "");
        assert_eq!(parameter_description_suffix(Some("db")), " with the description `db`");
        assert_eq!(
            parameter_description_suffix(Some("a\nb")),
            " with the description\n```\na\nb\n```"
        );
    }
}
