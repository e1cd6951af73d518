//! One report fragment per difference kind
//!
//! Every template reads only the difference record and the evaluation
//! context. A record missing data its kind requires (a component, a field
//! name, a parameter) breaks the comparator contract and fails rendering.

use super::describe::{
    connection_added, connection_removed, connection_route, from_to, parameter_context_summary,
    parameter_description_suffix, processor_configuration, property_lines,
};
use super::model::{DiffValue, DifferenceType, FlowDifference};
use crate::context::EvaluationContext;
use crate::errors::{ExError, FlowDiffError, Result};
use crate::model::{or_null, Component, Connection, Parameter, ParameterContext, ProcessGroup};
use flowdiff_core_types::SENSITIVE_PLACEHOLDER;

/// Where a rendered difference goes in the report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    /// Lines for the "Flow Changes" section
    Lines(Vec<String>),
    /// A line for the deduplicated "Bundle Changes" section
    Bundle(String),
    /// Cosmetic change, not reported
    Suppressed,
}

impl Rendered {
    fn line(line: String) -> Self {
        Rendered::Lines(vec![line])
    }
}

fn text(value: Option<&DiffValue>) -> String {
    value.map_or_else(|| "null".to_string(), ToString::to_string)
}

fn contract(err: FlowDiffError) -> ExError {
    ExError::from(err).with_op("render_difference")
}

fn component_a(diff: &FlowDifference) -> Result<&Component> {
    diff.component_a.as_ref().ok_or_else(|| {
        contract(FlowDiffError::MissingComponent {
            difference_type: diff.difference_type.to_string(),
            side: "A",
        })
    })
}

fn component_b(diff: &FlowDifference) -> Result<&Component> {
    diff.component_b.as_ref().ok_or_else(|| {
        contract(FlowDiffError::MissingComponent {
            difference_type: diff.difference_type.to_string(),
            side: "B",
        })
    })
}

fn field_name(diff: &FlowDifference) -> Result<&str> {
    diff.field_name.as_deref().ok_or_else(|| {
        contract(FlowDiffError::MissingFieldName {
            difference_type: diff.difference_type.to_string(),
        })
    })
}

fn unexpected_component(diff: &FlowDifference, expected: &'static str, actual: &Component) -> ExError {
    contract(FlowDiffError::UnexpectedComponent {
        difference_type: diff.difference_type.to_string(),
        expected,
        actual: actual.type_name().to_string(),
    })
}

fn unexpected_value(diff: &FlowDifference, expected: &'static str) -> ExError {
    contract(FlowDiffError::UnexpectedValue {
        difference_type: diff.difference_type.to_string(),
        expected,
    })
}

fn as_connection<'d>(diff: &FlowDifference, component: &'d Component) -> Result<&'d Connection> {
    match component {
        Component::Connection(c) => Ok(c),
        other => Err(unexpected_component(diff, "Connection", other)),
    }
}

fn as_parameter_context<'d>(
    diff: &FlowDifference,
    component: &'d Component,
) -> Result<&'d ParameterContext> {
    match component {
        Component::ParameterContext(c) => Ok(c),
        other => Err(unexpected_component(diff, "Parameter Context", other)),
    }
}

fn as_process_group<'d>(diff: &FlowDifference, component: &'d Component) -> Result<&'d ProcessGroup> {
    match component {
        Component::ProcessGroup(g) => Ok(g.as_ref()),
        other => Err(unexpected_component(diff, "Process Group", other)),
    }
}

fn property_is_sensitive(component: Option<&Component>, key: &str) -> bool {
    component
        .and_then(Component::as_extension)
        .is_some_and(|ext| ext.is_sensitive(key))
}

/// Whether the difference's field names a sensitive property or parameter
fn field_is_sensitive(diff: &FlowDifference) -> bool {
    let Some(key) = diff.field_name.as_deref() else {
        return false;
    };
    [diff.component_a.as_ref(), diff.component_b.as_ref()]
        .into_iter()
        .flatten()
        .any(|component| match component {
            Component::ParameterContext(pc) => pc.parameter(key).is_some_and(|p| p.sensitive),
            other => property_is_sensitive(Some(other), key),
        })
}

/// ``- In <component>, <label> changed from `a` to `b` ``
fn changed_in(component: &Component, label: &str, diff: &FlowDifference) -> Rendered {
    Rendered::line(format!(
        "- In {}, {} changed from `{}` to `{}`",
        component.describe(),
        label,
        text(diff.value_a.as_ref()),
        text(diff.value_b.as_ref())
    ))
}

fn connection_setting(diff: &FlowDifference, label: &str, verb: &str) -> Result<Rendered> {
    let connection = as_connection(diff, component_a(diff)?)?;
    Ok(Rendered::line(format!(
        "- The {} for the connection {} {} from `{}` to `{}`",
        label,
        connection_route(connection),
        verb,
        text(diff.value_a.as_ref()),
        text(diff.value_b.as_ref())
    )))
}

fn component_added(diff: &FlowDifference, ctx: &EvaluationContext<'_>) -> Result<Rendered> {
    let component = component_b(diff)?;
    let rendered = match component {
        Component::Funnel(_) => Rendered::line("- A Funnel has been added".to_string()),
        Component::Connection(connection) => Rendered::line(connection_added(connection)),
        Component::Processor(processor) => {
            let mut lines = vec![format!(
                "- A {} has been added with the configuration [{}] and the below properties:",
                component.describe(),
                processor_configuration(processor)
            )];
            lines.extend(property_lines(processor));
            Rendered::Lines(lines)
        }
        Component::ControllerService(service) => {
            let group_id = service.group_identifier.as_deref().unwrap_or_default();
            let group = ctx.process_group(group_id).ok_or_else(|| {
                contract(FlowDiffError::ProcessGroupNotFound {
                    group_id: group_id.to_string(),
                })
            })?;
            let mut lines = vec![format!(
                "- A {} has been added in Process Group `{}` with the below properties:",
                component.describe(),
                or_null(group.name.as_deref())
            )];
            lines.extend(property_lines(service));
            Rendered::Lines(lines)
        }
        Component::Label(label) => Rendered::Lines(vec![
            "- A Label has been added with the below text:".to_string(),
            "```".to_string(),
            label.label.clone(),
            "```".to_string(),
        ]),
        other => {
            let named = other
                .name()
                .map(|n| format!(" named `{}`", n))
                .unwrap_or_default();
            Rendered::line(format!("- A {}{} has been added", other.type_name(), named))
        }
    };
    Ok(rendered)
}

fn component_removed(diff: &FlowDifference) -> Result<Rendered> {
    let component = component_a(diff)?;
    let line = match component {
        Component::Funnel(_) => "- A Funnel has been removed".to_string(),
        Component::Connection(connection) => connection_removed(connection),
        other => format!("- A {} has been removed", other.describe()),
    };
    Ok(Rendered::line(line))
}

fn parameter_context_changed(diff: &FlowDifference, ctx: &EvaluationContext<'_>) -> Result<Rendered> {
    let group = as_process_group(diff, component_b(diff)?)?;
    let group_name = or_null(group.name.as_deref());
    let line = match group.parameter_context_name.as_deref().filter(|n| !n.is_empty()) {
        Some(name) => {
            let context = ctx.parameter_context(name).ok_or_else(|| {
                contract(FlowDiffError::ParameterContextNotFound {
                    context: name.to_string(),
                })
            })?;
            format!(
                "- The Parameter Context `{}` with parameters `{}` has been added to the process group `{}`",
                name,
                parameter_context_summary(context),
                group_name
            )
        }
        None => format!(
            "- The Parameter Context has been removed from the process group `{}`",
            group_name
        ),
    };
    Ok(Rendered::line(line))
}

fn parameter_in<'d>(context: &'d ParameterContext, key: &str) -> Result<&'d Parameter> {
    context.parameter(key).ok_or_else(|| {
        contract(FlowDiffError::ParameterNotFound {
            context: context.name.clone(),
            parameter: key.to_string(),
        })
    })
}

fn parameter_added(diff: &FlowDifference) -> Result<Rendered> {
    let key = field_name(diff)?;
    let context = as_parameter_context(diff, component_b(diff)?)?;
    let parameter = parameter_in(context, key)?;
    Ok(Rendered::line(format!(
        "- In the Parameter Context `{}` a parameter has been added: `{}` = `{}`{}",
        context.name,
        key,
        parameter.display_value(),
        parameter_description_suffix(parameter.description.as_deref())
    )))
}

/// Descriptions of a sensitive parameter are masked like its value
fn parameter_description_changed(diff: &FlowDifference) -> Result<Rendered> {
    let key = field_name(diff)?;
    let context = as_parameter_context(diff, component_a(diff)?)?;
    let (old, new) = if field_is_sensitive(diff) {
        (SENSITIVE_PLACEHOLDER.to_string(), SENSITIVE_PLACEHOLDER.to_string())
    } else {
        (text(diff.value_a.as_ref()), text(diff.value_b.as_ref()))
    };
    Ok(Rendered::line(format!(
        "- In the Parameter Context `{}` the description of the parameter `{}` has changed from {}",
        context.name,
        key,
        from_to(&old, &new)
    )))
}

fn parameter_value_changed(diff: &FlowDifference) -> Result<Rendered> {
    let key = field_name(diff)?;
    let before = as_parameter_context(diff, component_a(diff)?)?;
    let after = as_parameter_context(diff, component_b(diff)?)?;
    let old = parameter_in(before, key)?;
    let new = parameter_in(after, key)?;
    Ok(Rendered::line(format!(
        "- In the Parameter Context `{}`, the value of the parameter `{}` has changed from {}",
        after.name,
        key,
        from_to(&old.display_value(), &new.display_value())
    )))
}

fn property_changed(diff: &FlowDifference) -> Result<Rendered> {
    let component = component_a(diff)?;
    let key = field_name(diff)?;
    let sensitive = property_is_sensitive(Some(component), key)
        || property_is_sensitive(diff.component_b.as_ref(), key);
    let (old, new) = if sensitive {
        (SENSITIVE_PLACEHOLDER.to_string(), SENSITIVE_PLACEHOLDER.to_string())
    } else {
        (text(diff.value_a.as_ref()), text(diff.value_b.as_ref()))
    };
    Ok(Rendered::line(format!(
        "- In {}, the value of the property `{}` changed from {}",
        component.describe(),
        key,
        from_to(&old, &new)
    )))
}

/// Value of property `key` on component B, masked when sensitive
fn new_property_value(diff: &FlowDifference, key: &str) -> String {
    match diff.component_b.as_ref().and_then(Component::as_extension) {
        Some(ext) => ext.display_property(key),
        None => "null".to_string(),
    }
}

fn concurrent_tasks_changed(diff: &FlowDifference) -> Result<Rendered> {
    let component = component_a(diff)?;
    let (old, new) = match (
        diff.value_a.as_ref().and_then(DiffValue::as_i64),
        diff.value_b.as_ref().and_then(DiffValue::as_i64),
    ) {
        (Some(old), Some(new)) => (old, new),
        _ => return Err(unexpected_value(diff, "integer")),
    };
    let direction = if old > new { "decreased" } else { "increased" };
    Ok(Rendered::line(format!(
        "- In {}, the number of concurrent tasks has been {} from `{}` to `{}`",
        component.describe(),
        direction,
        old,
        new
    )))
}

fn versioned_flow_coordinates_changed(diff: &FlowDifference) -> Result<Rendered> {
    let group = as_process_group(diff, component_a(diff)?)?;
    let (before, after) = match (
        diff.value_a.as_ref().and_then(DiffValue::as_coordinates),
        diff.value_b.as_ref().and_then(DiffValue::as_coordinates),
    ) {
        (Some(before), Some(after)) => (before, after),
        _ => return Err(unexpected_value(diff, "versioned flow coordinates")),
    };
    Ok(Rendered::line(format!(
        "- The Versioned Flow Coordinates for the Process Group `{}` have changed: {}",
        or_null(group.name.as_deref()),
        before.describe_changes(&after)
    )))
}

fn bundle_changed(diff: &FlowDifference) -> Result<Rendered> {
    match (
        diff.value_a.as_ref().and_then(DiffValue::as_bundle),
        diff.value_b.as_ref().and_then(DiffValue::as_bundle),
    ) {
        (Some(before), Some(after)) => Ok(Rendered::Bundle(format!(
            "- The bundle `{}:{}` has been changed from version `{}` to version `{}`",
            before.group, before.artifact, before.version, after.version
        ))),
        _ => Err(unexpected_value(diff, "bundle")),
    }
}

fn destination_changed(diff: &FlowDifference) -> Result<Rendered> {
    match (
        diff.value_a.as_ref().and_then(DiffValue::as_connectable),
        diff.value_b.as_ref().and_then(DiffValue::as_connectable),
    ) {
        (Some(before), Some(after)) => Ok(Rendered::line(format!(
            "- The destination of a connection has changed from `{}` to `{}`",
            or_null(before.name.as_deref()),
            or_null(after.name.as_deref())
        ))),
        _ => Err(unexpected_value(diff, "connectable component")),
    }
}

/// Generic dump for kinds without a template
fn fallback(diff: &FlowDifference) -> Rendered {
    let (value_a, value_b) = if field_is_sensitive(diff) {
        (SENSITIVE_PLACEHOLDER.to_string(), SENSITIVE_PLACEHOLDER.to_string())
    } else {
        (text(diff.value_a.as_ref()), text(diff.value_b.as_ref()))
    };
    let describe = |c: Option<&Component>| c.map_or_else(|| "null".to_string(), Component::describe);
    Rendered::Lines(vec![
        format!(
            "- {} ({})",
            or_null(diff.description.as_deref()),
            diff.difference_type
        ),
        format!("  - {}", value_a),
        format!("  - {}", value_b),
        format!("  - {}", describe(diff.component_a.as_ref())),
        format!("  - {}", describe(diff.component_b.as_ref())),
        format!("  - {}", or_null(diff.field_name.as_deref())),
    ])
}

/// Render one difference
///
/// Differences touching a component kind this crate does not model go
/// through the generic fallback, cosmetic ones aside.
///
/// # Errors
///
/// Returns `ExErrorKind::ContractViolation` when the record lacks data its
/// kind requires.
pub fn render(diff: &FlowDifference, ctx: &EvaluationContext<'_>) -> Result<Rendered> {
    use DifferenceType as D;

    let unmodeled = diff
        .component_a
        .iter()
        .chain(&diff.component_b)
        .any(|c| !c.is_modeled());
    if unmodeled && !diff.difference_type.is_cosmetic() {
        return Ok(fallback(diff));
    }

    let a = || text(diff.value_a.as_ref());
    let b = || text(diff.value_b.as_ref());

    let rendered = match &diff.difference_type {
        D::ComponentAdded => component_added(diff, ctx)?,
        D::ComponentRemoved => component_removed(diff)?,
        D::DestinationChanged => destination_changed(diff)?,
        D::PropertyChanged => property_changed(diff)?,
        D::PropertyAdded => {
            let key = field_name(diff)?;
            Rendered::line(format!(
                "- In {}, a property has been added: `{}` = `{}`",
                component_a(diff)?.describe(),
                key,
                new_property_value(diff, key)
            ))
        }
        D::PropertyRemoved => Rendered::line(format!(
            "- In {}, the property `{}` has been removed",
            component_a(diff)?.describe(),
            field_name(diff)?
        )),
        D::PropertySensitivityChanged => Rendered::line(format!(
            "- In {}, the sensitivity of the property `{}` changed from `{}` to `{}`",
            component_a(diff)?.describe(),
            field_name(diff)?,
            a(),
            b()
        )),
        D::PropertyParameterized => {
            let key = field_name(diff)?;
            Rendered::line(format!(
                "- In {}, a property is now referencing a parameter: `{}` = `{}`",
                component_a(diff)?.describe(),
                key,
                new_property_value(diff, key)
            ))
        }
        D::PropertyParameterizationRemoved => Rendered::line(format!(
            "- In {}, the property `{}` is no longer referencing a parameter",
            component_a(diff)?.describe(),
            field_name(diff)?
        )),
        D::ConcurrentTasksChanged => concurrent_tasks_changed(diff)?,
        D::BulletinLevelChanged => Rendered::line(format!(
            "- In {}, the bulletin level has been changed from `{}` to `{}`",
            component_a(diff)?.describe(),
            a(),
            b()
        )),
        D::RunDurationChanged => changed_in(component_a(diff)?, "the Run Duration", diff),
        D::RunScheduleChanged => changed_in(component_a(diff)?, "the Run Schedule", diff),
        D::SchedulingStrategyChanged => {
            changed_in(component_a(diff)?, "the Scheduling Strategy", diff)
        }
        D::ScheduledStateChanged => changed_in(component_a(diff)?, "the Schedule State", diff),
        D::AutoTerminatedRelationshipsChanged => changed_in(
            component_a(diff)?,
            "the list of auto-terminated relationships",
            diff,
        ),
        D::PenaltyDurationChanged => changed_in(component_a(diff)?, "the penalty duration", diff),
        D::YieldDurationChanged => changed_in(component_a(diff)?, "the yield duration", diff),
        D::RetryCountChanged => {
            changed_in(component_a(diff)?, "the Number of Retry Attempts", diff)
        }
        D::MaxBackoffPeriodChanged => {
            changed_in(component_a(diff)?, "the Retry Maximum Back Off Period", diff)
        }
        D::BackoffMechanismChanged => {
            changed_in(component_a(diff)?, "the Retry Back Off Policy", diff)
        }
        D::RetriedRelationshipsChanged => {
            changed_in(component_a(diff)?, "the list of retried relationships", diff)
        }
        D::ExecutionModeChanged => changed_in(component_b(diff)?, "the Execution Mode", diff),
        D::FlowfileConcurrencyChanged => {
            changed_in(component_b(diff)?, "the FlowFile Concurrency", diff)
        }
        D::FlowfileOutboundPolicyChanged => {
            changed_in(component_b(diff)?, "the FlowFile Outbound Policy", diff)
        }
        D::BackpressureDataSizeThresholdChanged => {
            connection_setting(diff, "data size backpressure threshold", "has been changed")?
        }
        D::BackpressureObjectThresholdChanged => {
            connection_setting(diff, "flowfile number backpressure threshold", "has been changed")?
        }
        D::LoadBalanceStrategyChanged => {
            connection_setting(diff, "load balancing strategy", "has been changed")?
        }
        D::LoadBalanceCompressionChanged => {
            connection_setting(diff, "load balancing compression", "has been changed")?
        }
        D::FlowfileExpirationChanged => {
            connection_setting(diff, "flow file expiration", "has been changed")?
        }
        D::PartitioningAttributeChanged => {
            connection_setting(diff, "partitioning attribute", "has been changed")?
        }
        D::SelectedRelationshipsChanged => {
            connection_setting(diff, "selected relationships", "has been changed")?
        }
        D::PrioritizersChanged => connection_setting(diff, "prioritizers", "changed")?,
        D::ParameterContextChanged => parameter_context_changed(diff, ctx)?,
        D::BundleChanged => bundle_changed(diff)?,
        D::NameChanged => Rendered::line(format!(
            "- A {} has been renamed from `{}` to `{}`",
            component_a(diff)?.describe(),
            a(),
            b()
        )),
        D::ParameterAdded => parameter_added(diff)?,
        D::ParameterRemoved => Rendered::line(format!(
            "- In the Parameter Context `{}` the parameter `{}` has been removed",
            as_parameter_context(diff, component_b(diff)?)?.name,
            field_name(diff)?
        )),
        D::ParameterValueChanged => parameter_value_changed(diff)?,
        D::InheritedContextsChanged => Rendered::line(format!(
            "- In the Parameter Context `{}`, the list of inherited parameter contexts changed from `{}` to `{}`",
            as_parameter_context(diff, component_a(diff)?)?.name,
            a(),
            b()
        )),
        D::ParameterDescriptionChanged => parameter_description_changed(diff)?,
        D::CommentsChanged => Rendered::line(format!(
            "- The comment for the {} has been changed from {}",
            component_a(diff)?.describe(),
            from_to(&a(), &b())
        )),
        D::LabelValueChanged => Rendered::line(format!(
            "- A label has been updated and its text has been changed from {}",
            from_to(&a(), &b())
        )),
        D::VersionedFlowCoordinatesChanged => versioned_flow_coordinates_changed(diff)?,
        D::SizeChanged
        | D::StyleChanged
        | D::PositionChanged
        | D::BendpointsChanged
        | D::ZindexChanged => Rendered::Suppressed,
        D::Other(_) => fallback(diff),
    };
    Ok(rendered)
}
