//! Difference records as produced by the flow comparator

use serde::{Deserialize, Serialize};

use crate::model::{bracketed, Bundle, Component, ConnectableComponent, VersionedFlowCoordinates};

macro_rules! difference_types {
    ($($variant:ident => $name:literal,)*) => {
        /// Kind of a structural difference
        ///
        /// Kinds this crate does not know are kept verbatim in `Other` and
        /// rendered through the generic fallback.
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum DifferenceType {
            $($variant,)*
            Other(String),
        }

        impl DifferenceType {
            pub fn as_str(&self) -> &str {
                match self {
                    $(DifferenceType::$variant => $name,)*
                    DifferenceType::Other(name) => name,
                }
            }

            pub fn from_name(name: &str) -> DifferenceType {
                match name {
                    $($name => DifferenceType::$variant,)*
                    other => DifferenceType::Other(other.to_string()),
                }
            }
        }
    };
}

difference_types! {
    ComponentAdded => "COMPONENT_ADDED",
    ComponentRemoved => "COMPONENT_REMOVED",
    DestinationChanged => "DESTINATION_CHANGED",
    PropertyAdded => "PROPERTY_ADDED",
    PropertyRemoved => "PROPERTY_REMOVED",
    PropertyChanged => "PROPERTY_CHANGED",
    PropertySensitivityChanged => "PROPERTY_SENSITIVITY_CHANGED",
    PropertyParameterized => "PROPERTY_PARAMETERIZED",
    PropertyParameterizationRemoved => "PROPERTY_PARAMETERIZATION_REMOVED",
    ConcurrentTasksChanged => "CONCURRENT_TASKS_CHANGED",
    BackpressureDataSizeThresholdChanged => "BACKPRESSURE_DATA_SIZE_THRESHOLD_CHANGED",
    BackpressureObjectThresholdChanged => "BACKPRESSURE_OBJECT_THRESHOLD_CHANGED",
    BulletinLevelChanged => "BULLETIN_LEVEL_CHANGED",
    RunDurationChanged => "RUN_DURATION_CHANGED",
    RunScheduleChanged => "RUN_SCHEDULE_CHANGED",
    SchedulingStrategyChanged => "SCHEDULING_STRATEGY_CHANGED",
    ScheduledStateChanged => "SCHEDULED_STATE_CHANGED",
    ExecutionModeChanged => "EXECUTION_MODE_CHANGED",
    AutoTerminatedRelationshipsChanged => "AUTO_TERMINATED_RELATIONSHIPS_CHANGED",
    LoadBalanceStrategyChanged => "LOAD_BALANCE_STRATEGY_CHANGED",
    LoadBalanceCompressionChanged => "LOAD_BALANCE_COMPRESSION_CHANGED",
    PartitioningAttributeChanged => "PARTITIONING_ATTRIBUTE_CHANGED",
    FlowfileExpirationChanged => "FLOWFILE_EXPIRATION_CHANGED",
    PrioritizersChanged => "PRIORITIZERS_CHANGED",
    SelectedRelationshipsChanged => "SELECTED_RELATIONSHIPS_CHANGED",
    PenaltyDurationChanged => "PENALTY_DURATION_CHANGED",
    YieldDurationChanged => "YIELD_DURATION_CHANGED",
    RetryCountChanged => "RETRY_COUNT_CHANGED",
    RetriedRelationshipsChanged => "RETRIED_RELATIONSHIPS_CHANGED",
    BackoffMechanismChanged => "BACKOFF_MECHANISM_CHANGED",
    MaxBackoffPeriodChanged => "MAX_BACKOFF_PERIOD_CHANGED",
    NameChanged => "NAME_CHANGED",
    CommentsChanged => "COMMENTS_CHANGED",
    LabelValueChanged => "LABEL_VALUE_CHANGED",
    BundleChanged => "BUNDLE_CHANGED",
    ParameterContextChanged => "PARAMETER_CONTEXT_CHANGED",
    ParameterAdded => "PARAMETER_ADDED",
    ParameterRemoved => "PARAMETER_REMOVED",
    ParameterValueChanged => "PARAMETER_VALUE_CHANGED",
    ParameterDescriptionChanged => "PARAMETER_DESCRIPTION_CHANGED",
    InheritedContextsChanged => "INHERITED_CONTEXTS_CHANGED",
    FlowfileConcurrencyChanged => "FLOWFILE_CONCURRENCY_CHANGED",
    FlowfileOutboundPolicyChanged => "FLOWFILE_OUTBOUND_POLICY_CHANGED",
    VersionedFlowCoordinatesChanged => "VERSIONED_FLOW_COORDINATES_CHANGED",
    SizeChanged => "SIZE_CHANGED",
    StyleChanged => "STYLE_CHANGED",
    PositionChanged => "POSITION_CHANGED",
    BendpointsChanged => "BENDPOINTS_CHANGED",
    ZindexChanged => "ZINDEX_CHANGED",
}

impl DifferenceType {
    /// Layout-only changes left out of reports
    pub fn is_cosmetic(&self) -> bool {
        matches!(
            self,
            DifferenceType::SizeChanged
                | DifferenceType::StyleChanged
                | DifferenceType::PositionChanged
                | DifferenceType::BendpointsChanged
                | DifferenceType::ZindexChanged
        )
    }
}

impl From<String> for DifferenceType {
    fn from(name: String) -> Self {
        DifferenceType::from_name(&name)
    }
}

impl From<DifferenceType> for String {
    fn from(kind: DifferenceType) -> Self {
        kind.as_str().to_string()
    }
}

impl std::fmt::Display for DifferenceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Before/after value carried by a difference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DiffValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    List(Vec<DiffValue>),
    /// Structured values (bundle coordinates, connectable endpoints,
    /// versioned flow coordinates)
    Object(serde_json::Map<String, serde_json::Value>),
}

impl DiffValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            DiffValue::Integer(n) => Some(*n),
            DiffValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn as_object<T: serde::de::DeserializeOwned>(&self) -> Option<T> {
        match self {
            DiffValue::Object(map) => {
                serde_json::from_value(serde_json::Value::Object(map.clone())).ok()
            }
            _ => None,
        }
    }

    pub fn as_bundle(&self) -> Option<Bundle> {
        self.as_object()
    }

    pub fn as_connectable(&self) -> Option<ConnectableComponent> {
        self.as_object()
    }

    pub fn as_coordinates(&self) -> Option<VersionedFlowCoordinates> {
        self.as_object()
    }
}

impl std::fmt::Display for DiffValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiffValue::Null => f.write_str("null"),
            DiffValue::Bool(b) => write!(f, "{}", b),
            DiffValue::Integer(n) => write!(f, "{}", n),
            DiffValue::Float(x) => write!(f, "{}", x),
            DiffValue::Text(s) => f.write_str(s),
            DiffValue::List(items) => {
                let items: Vec<String> = items.iter().map(ToString::to_string).collect();
                f.write_str(&bracketed(&items))
            }
            DiffValue::Object(map) => write!(f, "{}", serde_json::Value::Object(map.clone())),
        }
    }
}

/// One typed, atomic change between two snapshots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowDifference {
    pub difference_type: DifferenceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_a: Option<Component>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_b: Option<Component>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_a: Option<DiffValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_b: Option<DiffValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FlowDifference {
    pub fn new(difference_type: DifferenceType) -> Self {
        Self {
            difference_type,
            component_a: None,
            component_b: None,
            value_a: None,
            value_b: None,
            field_name: None,
            description: None,
        }
    }
}
