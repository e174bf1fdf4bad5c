//! Property and backend tests for Stream

use std::io::{Seek, SeekFrom, Write};

use bytemuck_derive::{Pod, Zeroable};
use pack_stream::{Stream, StreamError};
use proptest::prelude::*;

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Zeroable, Pod)]
struct Packet {
    id: u32,
    value: f32,
}

proptest! {
    // -------------------------------------------------------------
    // 1. Whatever is written in chunks reads back identically.
    // -------------------------------------------------------------
    #[test]
    fn prop_chunks_round_trip(chunks in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..64), 0..32)) {
        let mut stream = Stream::in_memory();
        let mut total = 0u64;
        for c in &chunks {
            total += stream.write(c).unwrap() as u64;
        }
        prop_assert_eq!(stream.position(), total);

        stream.rewind().unwrap();
        for c in &chunks {
            prop_assert_eq!(&stream.read_exact(c.len()).unwrap(), c);
        }
        prop_assert!(stream.is_eof().unwrap());
    }

    // -------------------------------------------------------------
    // 2. Over-long reads fail with the exact shortfall.
    // -------------------------------------------------------------
    #[test]
    fn prop_short_read_reports_available(data in prop::collection::vec(any::<u8>(), 0..64), extra in 1usize..16) {
        let mut stream = Stream::from_bytes(data.clone());
        let needed = data.len() + extra;
        match stream.read_exact(needed) {
            Err(StreamError::UnexpectedEof { needed: n, available }) => {
                prop_assert_eq!(n, needed);
                prop_assert_eq!(available, data.len());
            }
            other => prop_assert!(false, "unexpected result: {:?}", other),
        }
        // seekable: nothing consumed
        prop_assert_eq!(stream.position(), 0);
    }

    // -------------------------------------------------------------
    // 3. Forward-only and seekable streams agree on content.
    // -------------------------------------------------------------
    #[test]
    fn prop_forward_only_matches_memory(data in prop::collection::vec(any::<u8>(), 0..256), split in 0usize..256) {
        let split = split.min(data.len());
        let mut forward = Stream::from_reader(std::io::Cursor::new(data.clone()));

        prop_assert_eq!(forward.read_exact(split).unwrap(), data[..split].to_vec());
        prop_assert_eq!(forward.read_to_end().unwrap(), data[split..].to_vec());
        prop_assert_eq!(forward.position(), data.len() as u64);
    }
}

#[test]
fn pod_values_round_trip() {
    let packets = [Packet { id: 1, value: 10.0 }, Packet { id: 2, value: -0.5 }];
    let mut stream = Stream::in_memory();
    for p in &packets {
        stream.write_pod(p).unwrap();
    }
    assert_eq!(stream.position(), 16);

    stream.rewind().unwrap();
    assert_eq!(stream.read_pod::<Packet>().unwrap(), packets[0]);
    assert_eq!(stream.read_pod::<Packet>().unwrap(), packets[1]);
    assert!(matches!(
        stream.read_pod::<Packet>(),
        Err(StreamError::UnexpectedEof { needed: 8, available: 0 })
    ));
}

#[test]
fn regular_file_is_seekable() {
    let mut file = tempfile::tempfile().unwrap();
    file.write_all(b"0123456789").unwrap();
    file.seek(SeekFrom::Start(4)).unwrap();

    let mut stream = Stream::from_file(file);
    assert!(stream.is_seekable());
    // picks up the offset the file was left at
    assert_eq!(stream.position(), 4);
    assert_eq!(stream.remaining(), Some(6));

    assert_eq!(stream.read_exact(3).unwrap(), b"456");
    stream.seek(1).unwrap();
    assert_eq!(stream.read_exact(2).unwrap(), b"12");
    stream.seek(10).unwrap();
    assert!(stream.is_eof().unwrap());
}

#[test]
fn file_writes_extend_the_file() {
    let named = tempfile::NamedTempFile::new().unwrap();
    let file = named.reopen().unwrap();

    let mut stream = Stream::from_file(file);
    stream.write(b"abc").unwrap();
    stream.write(b"def").unwrap();
    stream.flush().unwrap();

    assert_eq!(std::fs::read(named.path()).unwrap(), b"abcdef");
}

#[test]
fn append_mode_file_needs_a_seek_to_end() {
    let named = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(named.path(), b"head").unwrap();

    // the offset is only known once the file is moved to its end
    let open_append = || {
        std::fs::OpenOptions::new()
            .append(true)
            .open(named.path())
            .unwrap()
    };
    let stream = Stream::from_file(open_append());
    assert_eq!(stream.position(), 0);
    drop(stream);

    let mut file = open_append();
    file.seek(SeekFrom::End(0)).unwrap();
    let mut stream = Stream::from_file(file);
    assert_eq!(stream.position(), 4);
    let delta = stream
        .pos_change(|s| s.write(b"tail").map(|_| ()))
        .unwrap();
    assert_eq!(delta, 4);
    assert_eq!(stream.position(), 8);
    stream.flush().unwrap();
    assert_eq!(std::fs::read(named.path()).unwrap(), b"headtail");
}

#[cfg(unix)]
#[test]
fn character_device_is_not_seekable() {
    let file = std::fs::File::open("/dev/null").unwrap();
    let mut stream = Stream::from_file(file);
    assert!(!stream.is_seekable());
    assert!(matches!(stream.seek(0), Err(StreamError::NotSeekable)));
    assert!(stream.is_eof().unwrap());
}
