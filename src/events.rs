//! Context event stream schema
//!
//! Hosts that cannot call the store directly (replay tools, recorded
//! sessions, the CLI) feed the engine a stream of [`ContextEvent`] records,
//! either as NDJSON (one record per line) or as a JSON array.
//!
//! ```json
//! {"kind":"track","options":{"elementId":"problem-1","trackInView":true}}
//! {"kind":"environment","change":{"type":"resize","width":390,"height":844}}
//! {"kind":"element","elementId":"problem-1","signal":{"type":"click"}}
//! {"kind":"action","action":{"type":"updatePreferences","payload":{"fontSize":"large"}}}
//! ```

use crate::device::EnvironmentEvent;
use crate::error::ContextError;
use crate::interaction::{ElementSignal, TrackingOptions};
use crate::types::ContextAction;
use serde::{Deserialize, Serialize};

/// One record in a context event stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ContextEvent {
    /// Raw store action
    Action { action: ContextAction },
    /// Environment change routed through the device observer
    Environment { change: EnvironmentEvent },
    /// Signal on a tracked element
    #[serde(rename_all = "camelCase")]
    Element {
        element_id: String,
        signal: ElementSignal,
    },
    /// Document scroll position
    PageScroll { position: u32 },
    /// Click anywhere in the document
    #[serde(rename_all = "camelCase")]
    DocumentClick { element_id: String },
    /// Start tracking an element
    Track { options: TrackingOptions },
    /// Stop tracking an element
    #[serde(rename_all = "camelCase")]
    Untrack { element_id: String },
}

impl ContextEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            ContextEvent::Action { .. } => "action",
            ContextEvent::Environment { .. } => "environment",
            ContextEvent::Element { .. } => "element",
            ContextEvent::PageScroll { .. } => "pageScroll",
            ContextEvent::DocumentClick { .. } => "documentClick",
            ContextEvent::Track { .. } => "track",
            ContextEvent::Untrack { .. } => "untrack",
        }
    }

    /// Structural checks serde cannot express
    pub fn validate(&self) -> Result<(), ContextError> {
        match self {
            ContextEvent::Element { element_id, signal } => {
                require_id(element_id)?;
                if let ElementSignal::Visibility { ratio } = signal {
                    if !(0.0..=1.0).contains(ratio) {
                        return Err(ContextError::InvalidEvent(format!(
                            "visibility ratio {ratio} outside 0.0-1.0 for {element_id}"
                        )));
                    }
                }
                Ok(())
            }
            ContextEvent::DocumentClick { element_id } | ContextEvent::Untrack { element_id } => {
                require_id(element_id)
            }
            ContextEvent::Track { options } => require_id(&options.element_id),
            _ => Ok(()),
        }
    }
}

fn require_id(element_id: &str) -> Result<(), ContextError> {
    if element_id.trim().is_empty() {
        Err(ContextError::InvalidEvent("empty element id".to_string()))
    } else {
        Ok(())
    }
}

/// Parser for context event streams
pub struct EventAdapter;

impl EventAdapter {
    /// Parse a JSON array of events
    pub fn parse_array(json: &str) -> Result<Vec<ContextEvent>, ContextError> {
        let events: Vec<ContextEvent> = serde_json::from_str(json)?;
        Ok(events)
    }

    /// Parse newline-delimited events, skipping blank lines
    pub fn parse_ndjson(ndjson: &str) -> Result<Vec<ContextEvent>, ContextError> {
        let mut events = Vec::new();
        for (line_num, line) in ndjson.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            events.push(Self::parse_line(trimmed, line_num + 1)?);
        }
        Ok(events)
    }

    /// Parse a single NDJSON line; `line_num` is 1-based and only used in errors
    pub fn parse_line(line: &str, line_num: usize) -> Result<ContextEvent, ContextError> {
        serde_json::from_str::<ContextEvent>(line).map_err(|e| {
            ContextError::ParseError(format!("Failed to parse line {}: {}", line_num, e))
        })
    }

    /// Indices and errors of events that fail validation
    pub fn validate_events(events: &[ContextEvent]) -> Vec<(usize, ContextError)> {
        events
            .iter()
            .enumerate()
            .filter_map(|(index, event)| event.validate().err().map(|e| (index, e)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FontSize, PreferencesPatch};
    use pretty_assertions::assert_eq;

    const STREAM: &str = r#"
{"kind":"track","options":{"elementId":"problem-1","trackInView":true}}
{"kind":"environment","change":{"type":"resize","width":390,"height":844}}

{"kind":"element","elementId":"problem-1","signal":{"type":"visibility","ratio":0.8}}
{"kind":"pageScroll","position":120}
{"kind":"action","action":{"type":"updatePreferences","payload":{"fontSize":"large"}}}
"#;

    #[test]
    fn test_parse_ndjson() {
        let events = EventAdapter::parse_ndjson(STREAM).unwrap();
        assert_eq!(events.len(), 5);
        assert_eq!(events[0].kind(), "track");
        assert_eq!(
            events[1],
            ContextEvent::Environment {
                change: EnvironmentEvent::Resize {
                    width: 390,
                    height: 844
                }
            }
        );
        assert_eq!(
            events[4],
            ContextEvent::Action {
                action: ContextAction::UpdatePreferences(PreferencesPatch {
                    font_size: Some(FontSize::Large),
                    ..Default::default()
                })
            }
        );
    }

    #[test]
    fn test_parse_error_reports_line() {
        let err = EventAdapter::parse_ndjson("{\"kind\":\"pageScroll\",\"position\":1}\nnot json\n")
            .unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_parse_array() {
        let events = EventAdapter::parse_array(
            r#"[{"kind":"documentClick","elementId":"nav"},{"kind":"untrack","elementId":"nav"}]"#,
        )
        .unwrap();
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_validation() {
        let events = vec![
            ContextEvent::DocumentClick {
                element_id: " ".to_string(),
            },
            ContextEvent::Element {
                element_id: "a".to_string(),
                signal: ElementSignal::Visibility { ratio: 1.5 },
            },
            ContextEvent::PageScroll { position: 10 },
        ];
        let failures = EventAdapter::validate_events(&events);
        let indices: Vec<usize> = failures.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![0, 1]);
    }
}
