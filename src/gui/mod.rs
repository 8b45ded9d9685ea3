//! Presentation shell
//!
//! One window, one drawing area, two input events. The shell realizes the
//! window, hands the drawing area's X11 id to the pipeline as the display
//! surface, and forwards keypresses to the playback controller. Everything
//! stateful lives below, in the pipeline core.

use crate::config::{self, Config};
use crate::pipeline::{DisplaySurface, PipelineBuilder, PlaybackController, Session};
use crate::runtime::{GstRuntime, StreamRuntime};
use anyhow::{Context, anyhow};
use gst::prelude::*;
use gtk::prelude::*;
use std::sync::Arc;

pub fn run(config: Config) -> anyhow::Result<()> {
    gtk::init().context("failed to initialize GTK")?;

    let window = gtk::Window::new(gtk::WindowType::Toplevel);
    window.set_default_size(config.window_size.0, config.window_size.1);
    if config.fullscreen {
        window.fullscreen();
    }

    let video_area = gtk::DrawingArea::new();
    let vbox = gtk::Box::new(gtk::Orientation::Vertical, 0);
    vbox.pack_start(&video_area, true, true, 0);
    window.add(&vbox);
    window.show_all();

    // the sink needs a realized surface before the pipeline is assembled
    video_area.realize();
    let surface = display_surface(&video_area)?;

    let runtime = Arc::new(GstRuntime::new().context("failed to initialize the media runtime")?);
    let bus = runtime
        .bus()
        .ok_or_else(|| anyhow!("pipeline has no message bus"))?;

    let session = Session::new(config.address.as_str(), surface)?;
    window.set_title(&format!("{} - {}", config::app_name(), session.address()));

    let pipeline = PipelineBuilder::new(runtime.clone()).build(session.clone())?;
    let controller = PlaybackController::new(pipeline)?;

    // stream errors degrade to a frozen window instead of killing the
    // process; the camera may come back and re-announce its endpoint
    let bus_watch = bus
        .add_watch_local(|_, message| {
            match message.view() {
                gst::MessageView::Error(err) => {
                    log::error!(
                        "gui: pipeline error from {:?}: {} ({:?})",
                        message.src().map(|s| s.path_string()),
                        err.error(),
                        err.debug()
                    );
                }
                gst::MessageView::Eos(..) => {
                    log::warn!("gui: end of stream");
                }
                _ => {}
            }
            glib::ControlFlow::Continue
        })
        .context("failed to install the bus watch")?;

    let hotkeys = config.hotkey_map.clone();
    let key_controller = controller.clone();
    window.connect_key_press_event(move |_, event| {
        let key = event.keyval();
        if key == hotkeys.pause {
            if let Err(err) = key_controller.toggle() {
                log::debug!("gui: ignored keypress: {err}");
            }
        } else if key == hotkeys.quit {
            gtk::main_quit();
        }
        glib::Propagation::Proceed
    });

    window.connect_delete_event(|_, _| {
        gtk::main_quit();
        glib::Propagation::Proceed
    });

    controller.start()?;
    log::info!(
        "gui: viewing {} (pipeline {})",
        session.address(),
        runtime.processing_state()
    );

    gtk::main();

    drop(bus_watch);
    controller.stop()?;
    Ok(())
}

/// The drawing area's X11 window id, which is the platform handle the video
/// sink renders into.
fn display_surface(area: &gtk::DrawingArea) -> anyhow::Result<DisplaySurface> {
    let window = area
        .window()
        .ok_or_else(|| anyhow!("video area is not realized"))?;
    let xwindow = window
        .downcast::<gdkx11::X11Window>()
        .map_err(|_| anyhow!("video output requires an X11 display"))?;
    Ok(DisplaySurface::from(xwindow.xid() as usize))
}
