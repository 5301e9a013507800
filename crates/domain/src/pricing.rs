//! The canonical usage -> credits mapping (§4.1.2 of the platform spec).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Raw usage counters from a completed run. Unknown keys are tolerated and
/// contribute zero, so callers can widen this struct's source format without
/// breaking pricing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub llm_tokens_in: i64,
    #[serde(default)]
    pub llm_tokens_out: i64,
    #[serde(default)]
    pub tool_calls: i64,
    #[serde(default)]
    pub requests: i64,
    #[serde(default)]
    pub rag_queries: i64,
    /// Any additional counters the caller sent that this version of the
    /// pricing table does not know how to charge for; always zero-rated.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Usage {
    pub fn is_empty(&self) -> bool {
        self.llm_tokens_in == 0
            && self.llm_tokens_out == 0
            && self.tool_calls == 0
            && self.requests == 0
            && self.rag_queries == 0
    }
}

/// `price(usage)`: integer-floor per dimension, summed, floored at a minimum
/// of 1 credit. `price({}) == 1`.
///
/// `llm_tokens_out` is rated at double `llm_tokens_in` (1 credit per 500
/// tokens rather than per 1000), so the two share the same divide-then-floor
/// shape with a different divisor.
pub fn price(usage: &Usage) -> i64 {
    let total = usage.llm_tokens_in / 1000
        + usage.llm_tokens_out / 500
        + usage.tool_calls
        + usage.requests
        + usage.rag_queries / 10;
    total.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_of_empty_usage_is_one() {
        assert_eq!(price(&Usage::default()), 1);
    }

    #[test]
    fn price_matches_happy_path_scenario() {
        let usage = Usage {
            llm_tokens_in: 1500,
            llm_tokens_out: 500,
            tool_calls: 2,
            requests: 1,
            rag_queries: 25,
            extra: HashMap::new(),
        };
        // llm_tokens_in: 1500 // 1000 = 1
        // llm_tokens_out: 500 // 500 = 1
        // tool_calls: 2
        // requests: 1
        // rag_queries: 25 // 10 = 2
        // total = 1 + 1 + 2 + 1 + 2 = 7
        assert_eq!(price(&usage), 7);
    }

    #[test]
    fn price_never_below_one() {
        let usage = Usage {
            llm_tokens_in: 10,
            ..Default::default()
        };
        assert_eq!(price(&usage), 1);
    }

    #[test]
    fn price_ignores_unknown_keys() {
        let mut extra = HashMap::new();
        extra.insert("mystery".to_string(), serde_json::json!(999));
        let usage = Usage {
            extra,
            ..Default::default()
        };
        assert_eq!(price(&usage), 1);
    }

    #[test]
    fn price_monotonic_but_not_strictly_additive() {
        let a = Usage {
            tool_calls: 1,
            ..Default::default()
        };
        let b = Usage {
            tool_calls: 1,
            ..Default::default()
        };
        let combined = Usage {
            tool_calls: 2,
            ..Default::default()
        };
        let (pa, pb, pc) = (price(&a), price(&b), price(&combined));
        assert!(pa + pb >= pc);
        assert!(pc >= pa.max(pb));
    }
}
