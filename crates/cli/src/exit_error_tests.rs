// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn config_errors_exit_with_two() {
    let err = anyhow::Error::new(ExitError::config("rule.r.information: bad"));
    assert_eq!(exit_code(&err), EXIT_CONFIG);
    assert_eq!(err.to_string(), "rule.r.information: bad");
}

#[test]
fn other_errors_exit_with_one() {
    assert_eq!(exit_code(&anyhow::anyhow!("boom")), EXIT_FAILURE);
    let err = anyhow::Error::new(ExitError::new(EXIT_INTERRUPTED, "interrupted"));
    assert_eq!(exit_code(&err), 130);
}
