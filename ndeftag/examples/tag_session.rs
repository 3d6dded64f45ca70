// End-to-end tag session walkthrough against a mock tag.

// Demonstrates the full lifecycle: subscribe to notifications, start
// listening, discover a tag, publish a message, then rediscover and read it
// back. Run with RUST_LOG=debug to see the session's internal logging.

use ndeftag::prelude::*;
use ndeftag::tag::MockTag;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = ConfigStore::new(Configuration::default());
    let mut session = SessionController::new(config);

    session.subscribe(|event| match event {
        Event::TagDiscovered(info, format_mode) => {
            println!("discovered tag {} (format mode: {})", info.id, format_mode);
        }
        Event::TagConnected => println!("connected"),
        Event::TagDisconnected => println!("disconnected"),
        Event::MessagePublished(info) => {
            println!("published {} record(s), {} bytes capacity", info.records.len(), info.capacity_bytes);
        }
        Event::MessageReceived(info) => {
            for record in &info.records {
                match record.type_format {
                    TypeNameFormat::WellKnown => {
                        println!("  text: {:?}", record.payload_as_text());
                    }
                    TypeNameFormat::Uri => {
                        println!("  uri: {}", record.uri.as_deref().unwrap_or("<none>"));
                    }
                    other => println!("  {:?} record, {} byte(s)", other, record.payload.len()),
                }
            }
        }
        Event::ListeningStatusChanged(on) => println!("listening: {on}"),
        Event::RadioStatusChanged(on) => println!("radio: {on}"),
    });

    session.start_listening();

    // Publish a text and a URI record to a blank tag.
    session.start_publishing(false);
    let id = vec![0x04, 0xD1, 0x5E, 0x22, 0x7F, 0x03];
    let discovered = session.on_tag_discovered(Box::new(MockTag::with_ndef(
        id.clone(),
        137,
        true,
        None,
    )))?;

    let outgoing = discovered.with_records(vec![
        NdefRecord::text("hello from ndeftag", Some("en")),
        NdefRecord::uri("https://example.com"),
    ]);
    let published = session.write(Some(&outgoing), false)?;
    println!("tag now carries {} record(s)", published.records.len());

    // Rediscover the same content on a fresh handle and read it back.
    session.stop_publishing();
    let bytes = message::build(&outgoing.records, "en", None)?;
    session.on_tag_discovered(Box::new(MockTag::with_ndef(id, 137, true, Some(bytes))))?;

    session.stop_listening();
    Ok(())
}
