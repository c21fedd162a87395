// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn missing_binary_is_a_launch_error() {
    let launcher = ProcessLauncher::new(
        "athena",
        PluginDef { cmd: "/nonexistent/prepalert-provider-athena".to_string(), args: vec![] },
    );
    let err = launcher.launch().await.err().unwrap();
    assert!(matches!(err, BridgeError::Launch(_)), "{err}");
}

#[tokio::test]
async fn child_that_exits_fails_the_handshake() {
    let launcher = ProcessLauncher::new(
        "broken",
        PluginDef {
            cmd: "sh".to_string(),
            args: vec!["-c".to_string(), "echo starting up >&2; exit 0".to_string()],
        },
    );
    let err = launcher.launch().await.err().unwrap();
    assert!(matches!(err, BridgeError::Protocol(_)), "{err}");
}
