// Copyright 2026 the Krakatoa Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads events recorded by a
//! [`RecorderSink`](super::recorder::RecorderSink) and writes
//! [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! Control-thread events go to `tid` 0 and render-thread events to `tid` 1.
//! Each render loop becomes a duration slice from `Started` to `Stopped`.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use krakatoa_core::trace::RenderLoopEventKind;

use crate::recorder::RecordedEvent;

const CONTROL_TID: u32 = 0;
const RENDER_TID: u32 = 1;

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
pub fn export(events: &[RecordedEvent], writer: &mut dyn Write) -> io::Result<()> {
    let events: Vec<Value> = events.iter().map(to_json).collect();
    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn instant(name: &str, cat: &str, ts: f64, tid: u32, args: Value) -> Value {
    json!({
        "ph": "i",
        "name": name,
        "cat": cat,
        "ts": ts,
        "pid": 0,
        "tid": tid,
        "s": "t",
        "args": args,
    })
}

fn to_json(recorded: &RecordedEvent) -> Value {
    match recorded {
        RecordedEvent::Precondition(e) => instant(
            "Precondition",
            "Gate",
            e.timestamp.as_micros_f64(),
            CONTROL_TID,
            json!({
                "update": format!("{:?}", e.update),
                "all_ready": e.all_ready,
                "gate": format!("{:?}", e.gate),
            }),
        ),
        RecordedEvent::Activation(e) => instant(
            "Activate",
            "Gate",
            e.timestamp.as_micros_f64(),
            CONTROL_TID,
            json!({
                "surface": e.surface.0,
                "error_status": e.error_status,
            }),
        ),
        RecordedEvent::Failure(e) => json!({
            "ph": "i",
            "name": "Failure",
            "cat": "Gate",
            "ts": e.timestamp.as_micros_f64(),
            "pid": 0,
            "tid": CONTROL_TID,
            "s": "g",
            "args": { "reason": e.reason.to_string() },
        }),
        RecordedEvent::Surface(e) => instant(
            &format!("Surface {:?}", e.kind),
            "Surface",
            e.timestamp.as_micros_f64(),
            CONTROL_TID,
            json!({ "surface": e.surface.0 }),
        ),
        RecordedEvent::RenderLoop(e) => {
            let ts = e.timestamp.as_micros_f64();
            let args = json!({ "surface": e.surface.0 });
            match e.kind {
                RenderLoopEventKind::Started => json!({
                    "ph": "B",
                    "name": "RenderLoop",
                    "cat": "Render",
                    "ts": ts,
                    "pid": 0,
                    "tid": RENDER_TID,
                    "args": args,
                }),
                RenderLoopEventKind::Stopped { frames } => json!({
                    "ph": "E",
                    "name": "RenderLoop",
                    "cat": "Render",
                    "ts": ts,
                    "pid": 0,
                    "tid": RENDER_TID,
                    "args": { "surface": e.surface.0, "frames": frames },
                }),
                RenderLoopEventKind::StopRequested => {
                    instant("StopRequested", "Render", ts, CONTROL_TID, args)
                }
                RenderLoopEventKind::Faulted { status } => instant(
                    "Faulted",
                    "Render",
                    ts,
                    RENDER_TID,
                    json!({ "surface": e.surface.0, "status": status }),
                ),
            }
        }
        RecordedEvent::ArCheck(e) => instant(
            "ArCheck",
            "AR",
            e.timestamp.as_micros_f64(),
            CONTROL_TID,
            json!({
                "availability": format!("{:?}", e.availability),
                "install_prompt": e.install_prompt,
                "readiness": format!("{:?}", e.readiness),
            }),
        ),
        RecordedEvent::HostLifecycle(e) => instant(
            &format!("{:?}", e.kind),
            "Host",
            e.timestamp.as_micros_f64(),
            CONTROL_TID,
            json!({}),
        ),
        RecordedEvent::FrameDrawn(e) => {
            let draw = e.finished.saturating_duration_since(e.frame.now);
            json!({
                "ph": "X",
                "name": "draw_frame",
                "cat": "Frame",
                "ts": e.frame.now.as_micros_f64(),
                "dur": draw.nanos() as f64 / 1000.0,
                "pid": 0,
                "tid": RENDER_TID,
                "args": {
                    "surface": e.surface.0,
                    "index": e.frame.index,
                    "delta_ms": e.frame.delta.as_secs_f32() * 1000.0,
                    "error": e.error.map(|err| err.to_string()),
                }
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use krakatoa_core::error::FailureReason;
    use krakatoa_core::surface::SurfaceId;
    use krakatoa_core::time::HostTime;
    use krakatoa_core::trace::{FailureEvent, RenderLoopEvent, TraceSink};

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_render_loop(&RenderLoopEvent {
            timestamp: HostTime(1_000_000),
            surface: SurfaceId(0),
            kind: RenderLoopEventKind::Started,
        });
        rec.on_failure(&FailureEvent {
            timestamp: HostTime(1_500_000),
            reason: FailureReason::ArUnsupported,
        });
        rec.on_render_loop(&RenderLoopEvent {
            timestamp: HostTime(2_000_000),
            surface: SurfaceId(0),
            kind: RenderLoopEventKind::Stopped { frames: 12 },
        });

        let mut out = Vec::new();
        export(rec.events(), &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 3);

        assert_eq!(parsed[0]["ph"], "B");
        assert_eq!(parsed[0]["name"], "RenderLoop");
        assert_eq!(parsed[0]["ts"], 1000.0);

        assert_eq!(parsed[1]["ph"], "i");
        assert_eq!(parsed[1]["s"], "g");
        assert_eq!(parsed[1]["args"]["reason"], "AR is not supported on this device");

        assert_eq!(parsed[2]["ph"], "E");
        assert_eq!(parsed[2]["args"]["frames"], 12);
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty());
    }
}
