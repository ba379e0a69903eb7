use prometheus::{Encoder, Gauge, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;
use crate::tools::ToolName;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnStats {
    pub turns: u64,
    pub tool_invocations: u64,
    pub tool_failures: u64,
    pub collaborator_failures: u64,
}

/// Prometheus counters for the dispatch pipeline. Cheap to clone; clones
/// share one registry.
#[derive(Clone)]
pub struct MetricsCollector {
    registry: Arc<Registry>,
    turns: IntCounter,
    tool_invocations: IntCounterVec,
    tool_failures: IntCounterVec,
    collaborator_failures: IntCounter,
    collaborator_latency: Histogram,
    in_flight: Gauge,
}

impl MetricsCollector {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let turns = IntCounter::with_opts(
            Opts::new("lambda_turns_total", "Total number of user turns")
                .const_label("component", "orchestrator"),
        )?;

        let tool_invocations = IntCounterVec::new(
            Opts::new("lambda_tool_invocations_total", "Tool invocations by tool"),
            &["tool"],
        )?;

        let tool_failures = IntCounterVec::new(
            Opts::new("lambda_tool_failures_total", "Tool invocations that returned a failure"),
            &["tool"],
        )?;

        let collaborator_failures = IntCounter::with_opts(Opts::new(
            "lambda_collaborator_failures_total",
            "Text-generation calls that failed or timed out",
        ))?;

        let collaborator_latency = Histogram::with_opts(
            HistogramOpts::new(
                "lambda_collaborator_latency_seconds",
                "Text-generation call latency in seconds",
            )
            .buckets(vec![0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        )?;

        let in_flight = Gauge::with_opts(Opts::new("lambda_turns_in_flight", "Turns currently being processed"))?;

        registry.register(Box::new(turns.clone()))?;
        registry.register(Box::new(tool_invocations.clone()))?;
        registry.register(Box::new(tool_failures.clone()))?;
        registry.register(Box::new(collaborator_failures.clone()))?;
        registry.register(Box::new(collaborator_latency.clone()))?;
        registry.register(Box::new(in_flight.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            turns,
            tool_invocations,
            tool_failures,
            collaborator_failures,
            collaborator_latency,
            in_flight,
        })
    }

    pub fn record_turn(&self) {
        self.turns.inc();
    }

    pub fn record_collaborator_call(&self, elapsed: Duration, success: bool) {
        self.collaborator_latency.observe(elapsed.as_secs_f64());
        if !success {
            self.collaborator_failures.inc();
        }
    }

    pub fn record_tool(&self, tool: ToolName, success: bool) {
        let labels = &[tool.as_str()];
        self.tool_invocations.with_label_values(labels).inc();
        if !success {
            self.tool_failures.with_label_values(labels).inc();
        }
    }

    pub fn increment_in_flight(&self) {
        self.in_flight.inc();
    }

    pub fn decrement_in_flight(&self) {
        self.in_flight.dec();
    }

    pub fn in_flight(&self) -> f64 {
        self.in_flight.get()
    }

    /// Text exposition format.
    pub fn export(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| crate::error::ChatError::Unknown(e.to_string()))
    }

    pub fn stats(&self) -> TurnStats {
        let sum = |vec: &IntCounterVec| -> u64 {
            ToolName::ALL
                .iter()
                .map(|tool| vec.with_label_values(&[tool.as_str()]).get())
                .sum()
        };

        TurnStats {
            turns: self.turns.get(),
            tool_invocations: sum(&self.tool_invocations),
            tool_failures: sum(&self.tool_failures),
            collaborator_failures: self.collaborator_failures.get(),
        }
    }
}
