//! Scenario tests driving the whole answering pipeline.
