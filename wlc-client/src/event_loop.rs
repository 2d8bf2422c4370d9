//! Connection setup and the blocking dispatch loop.

use tracing::info;
use wayland_client::Connection;

use wlc_input::InputSink;

use crate::app::DemoApp;
use crate::config::Config;
use crate::errors::ClientError;

/// Connects to the compositor and runs the client until the toplevel is
/// closed or the connection fails.
///
/// One handler runs at a time, to completion; the only blocking point is
/// the dispatch call itself. A hard dispatch error returns without
/// flushing any partially accumulated frame state.
pub fn run(config: Config, sink: Box<dyn InputSink>) -> Result<(), ClientError> {
    let conn = Connection::connect_to_env()?;
    let mut queue = conn.new_event_queue();
    let qh = queue.handle();
    let _registry = conn.display().get_registry(&qh, ());

    let mut app = DemoApp::new(config, sink);
    // One roundtrip lands every already-advertised global.
    queue.roundtrip(&mut app)?;
    app.create_window(&qh)?;
    info!("window created, entering dispatch loop");

    while !app.closed() {
        queue.blocking_dispatch(&mut app)?;
    }
    info!("toplevel closed, shutting down");
    Ok(())
}
