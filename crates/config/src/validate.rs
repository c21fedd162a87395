// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cross-reference checks run after every block has been read.

use crate::error::ConfigError;
use crate::parser::information_query_refs;
use crate::types::Config;

pub(crate) fn validate_cross_refs(config: &Config) -> Result<(), ConfigError> {
    for query in &config.queries {
        if config.provider(&query.query_type, &query.provider).is_none() {
            return Err(ConfigError::invalid(
                format!("query.{}.{}.provider", query.query_type, query.name),
                format!("provider \"{}.{}\" is not defined", query.query_type, query.provider),
            ));
        }
    }

    for rule in &config.rules {
        let from_information = information_query_refs(&rule.information).unwrap_or_default();
        for fqn in &rule.query_refs {
            if config.query(fqn).is_some() {
                continue;
            }
            let attr = if from_information.contains(fqn) { "information" } else { "queries" };
            return Err(ConfigError::invalid(
                format!("rule.{}.{attr}", rule.name),
                format!("query \"{fqn}\" is not defined"),
            ));
        }

        if rule.post_graph_annotation && rule.service.is_none() {
            return Err(ConfigError::invalid(
                format!("rule.{}.post_graph_annotation", rule.name),
                "post_graph_annotation requires a service (set service on the rule or in the prepalert block)",
            ));
        }
    }
    Ok(())
}
