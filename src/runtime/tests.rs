use std::time::Duration;

use tempfile::tempdir;

use super::{AppContext, AppError};
use crate::config::AppConfig;
use crate::control::ControlError;
use crate::dispatch::{Command, command_channel};
use crate::identity::FileIdentity;
use crate::test_support::{COPY_RENDERER, FAILING_RENDERER, shell_renderer, write_png_source};

fn context_with_renderer(script: &str) -> AppContext {
    let command = shell_renderer(script);
    let mut config = AppConfig::default();
    config.renderer.program = command.program;
    config.renderer.args = command.args;
    AppContext::new(config)
}

#[test]
fn forwarded_identities_reach_the_listening_instance() {
    let mut config = AppConfig::default();
    config.control.port = 0;
    let server = AppContext::new(config.clone());
    let (sender, commands) = command_channel();
    let handle = server.bind_control(sender).expect("bind control");

    config.control.port = handle.local_addr().port();
    let client = AppContext::new(config);
    let identities = client.normalize_all(&["untitled:one", "untitled:two"]);
    client.forward(&identities).expect("forward");

    for expected in identities {
        match commands.recv_timeout(Duration::from_secs(5)).expect("command") {
            Command::OpenOrActivate(identity) => assert_eq!(identity, expected),
            other => panic!("unexpected command: {other:?}"),
        }
    }
    handle.shutdown();
}

#[test]
fn forward_without_a_listener_is_a_connect_error() {
    let probe = std::net::TcpListener::bind("127.0.0.1:0").expect("probe");
    let port = probe.local_addr().expect("probe addr").port();
    drop(probe);

    let mut config = AppConfig::default();
    config.control.port = port;
    let identities = vec![FileIdentity::Virtual("untitled:one".into())];
    let error = AppContext::new(config)
        .forward(&identities)
        .expect_err("nobody listening");
    assert!(matches!(
        error,
        AppError::Control(ControlError::Connect { .. })
    ));
}

#[cfg(unix)]
#[test]
fn render_to_writes_the_encoded_artifact() {
    let workspace = tempdir().expect("tempdir");
    let source = write_png_source(workspace.path(), "flow.puml");
    let output = workspace.path().join("flow.png");

    let image = context_with_renderer(COPY_RENDERER)
        .render_to(&source, &output)
        .expect("render");
    assert_eq!(image.size(), [3, 2]);
    assert_eq!(std::fs::read(&output).expect("output"), image.encoded);
}

#[cfg(unix)]
#[test]
fn render_to_surfaces_renderer_failures() {
    let workspace = tempdir().expect("tempdir");
    let source = write_png_source(workspace.path(), "flow.puml");
    let output = workspace.path().join("flow.png");

    let error = context_with_renderer(FAILING_RENDERER)
        .render_to(&source, &output)
        .expect_err("renderer fails");
    assert!(matches!(error, AppError::Render(_)));
    assert!(!output.exists());
}
