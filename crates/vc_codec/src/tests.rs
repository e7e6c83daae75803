//! End-to-end scenarios over the public drivers.

use alloc::boxed::Box;
use alloc::collections::{BTreeMap, BTreeSet, LinkedList, VecDeque};
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::time::Duration;
use std::collections::{HashMap, HashSet};

use vc_reflect::info::{TypePath, Typed};
use vc_reflect::registry::TypeRegistry;
use vc_reflect::{
    Reflect, impl_reflect_enum, impl_reflect_enumerable, impl_reflect_interface,
    impl_reflect_struct,
};

use crate::{
    Codec, CodecConfig, CodecError, CodecOptions, ReadOutcome, ReadState, WriteOutcome, WriteState,
};

// -----------------------------------------------------------------------------
// Fixtures

trait Shape: Reflect {
    fn area(&self) -> f64;
}

impl_reflect_interface!(Shape);

#[derive(Debug, Default, PartialEq)]
struct Circle {
    radius: f64,
}

impl_reflect_struct!(Circle { radius: f64 });

impl Shape for Circle {
    fn area(&self) -> f64 {
        core::f64::consts::PI * self.radius * self.radius
    }
}

#[derive(Debug, Default, PartialEq)]
struct Rect {
    w: f32,
    h: f32,
}

impl_reflect_struct!(Rect { w: f32, h: f32 });

impl Shape for Rect {
    fn area(&self) -> f64 {
        f64::from(self.w * self.h)
    }
}

/// Known to the writer only.
#[derive(Debug, Default, PartialEq)]
struct Triangle {
    base: f32,
    height: f32,
    label: String,
}

impl_reflect_struct!(Triangle {
    base: f32,
    height: f32,
    label: String,
});

impl Shape for Triangle {
    fn area(&self) -> f64 {
        f64::from(self.base * self.height) / 2.0
    }
}

#[derive(Debug, Default, PartialEq)]
struct Blank;

impl_reflect_struct!(Blank {});

impl Shape for Blank {
    fn area(&self) -> f64 {
        0.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[repr(u8)]
enum Kind {
    #[default]
    Plain = 0,
    Fancy = 3,
}

impl_reflect_enum!(Kind: u8 { Plain, Fancy });

#[derive(Debug, Default, PartialEq)]
struct Inner {
    id: u16,
    note: Option<String>,
}

impl_reflect_struct!(Inner {
    id: u16,
    note: Option<String>,
});

#[derive(Default)]
struct Everything {
    flag: bool,
    letter: char,
    small: i8,
    wide: i128,
    size: usize,
    ratio: f64,
    text: String,
    wait: Duration,
    maybe: Option<u32>,
    nested: Option<Inner>,
    kind: Kind,
    fixed: [u16; 3],
    boxed: Box<[u8]>,
    list: Vec<Option<String>>,
    queue: VecDeque<i32>,
    chain: LinkedList<u8>,
    set: BTreeSet<u16>,
    table: BTreeMap<String, Vec<u8>>,
    shape: Option<Box<dyn Shape>>,
    shapes: Vec<Box<dyn Shape>>,
    empty: Vec<u64>,
}

impl_reflect_struct!(Everything {
    flag: bool,
    letter: char,
    #[index = 9]
    small: i8,
    wide: i128,
    size: usize,
    ratio: f64,
    text: String,
    wait: Duration,
    maybe: Option<u32>,
    #[index = 2]
    nested: Option<Inner>,
    kind: Kind,
    fixed: [u16; 3],
    boxed: Box<[u8]>,
    list: Vec<Option<String>>,
    queue: VecDeque<i32>,
    chain: LinkedList<u8>,
    set: BTreeSet<u16>,
    table: BTreeMap<String, Vec<u8>>,
    shape: Option<Box<dyn Shape>>,
    shapes: Vec<Box<dyn Shape>>,
    empty: Vec<u64>,
});

fn everything() -> Everything {
    Everything {
        flag: true,
        letter: 'ß',
        small: -3,
        wide: -(1 << 100),
        size: 12_345,
        ratio: 0.25,
        text: String::from("héllo"),
        wait: Duration::new(5, 250),
        maybe: Some(9),
        nested: Some(Inner {
            id: 4,
            note: None,
        }),
        kind: Kind::Fancy,
        fixed: [1, 2, 3],
        boxed: vec![7, 8].into_boxed_slice(),
        list: vec![Some(String::from("a")), None, Some(String::new())],
        queue: VecDeque::from([-1, 2]),
        chain: LinkedList::from([3, 4, 5]),
        set: BTreeSet::from([10, 20]),
        table: BTreeMap::from([(String::from("k"), vec![1, 2]), (String::from("e"), vec![])]),
        shape: Some(Box::new(Circle { radius: 1.5 })),
        shapes: vec![Box::new(Rect { w: 2.0, h: 3.0 }), Box::new(Circle { radius: 0.5 })],
        empty: Vec::new(),
    }
}

fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry.register_implementation::<Box<dyn Shape>, Circle>();
    registry.register_implementation::<Box<dyn Shape>, Rect>();
    registry
}

fn codec(options: CodecOptions) -> Codec {
    Codec::new(registry()).with_config(CodecConfig::default().with_options(options))
}

fn concrete(shape: &dyn Shape) -> &dyn Reflect {
    shape.as_reflect()
}

const OPTION_SETS: [CodecOptions; 5] = [
    CodecOptions::empty(),
    CodecOptions::USE_PROPERTY_NAMES,
    CodecOptions::INCLUDE_PROPERTY_TYPES,
    CodecOptions::IGNORE_INDEX_ATTRIBUTE.union(CodecOptions::INDEX_SIZE_UINT16),
    CodecOptions::all(),
];

// -----------------------------------------------------------------------------
// Chunked drivers

/// Feeds `bytes` in fragments of `size`, carrying unconsumed bytes over.
fn read_in_chunks(state: &mut ReadState, bytes: &[u8], size: usize) -> Box<dyn Reflect> {
    let mut pending = Vec::new();
    let mut offset = 0;
    loop {
        let end = (offset + size).min(bytes.len());
        pending.extend_from_slice(&bytes[offset..end]);
        offset = end;
        match state.try_read(&pending).unwrap() {
            ReadOutcome::Complete { value, consumed } => {
                assert_eq!(consumed, pending.len());
                assert_eq!(offset, bytes.len());
                return value;
            }
            ReadOutcome::NeedMoreBytes { consumed, needed } => {
                assert!(needed > 0);
                assert!(offset < bytes.len(), "ran out of input with {needed} bytes missing");
                pending.drain(..consumed);
            }
        }
    }
}

/// Writes into chunks of `size`, growing a chunk only for a unit that never fits.
fn write_in_chunks(state: &mut WriteState<'_>, size: usize) -> Vec<u8> {
    let mut out = Vec::new();
    let mut chunk = vec![0_u8; size];
    loop {
        match state.try_write(&mut chunk).unwrap() {
            WriteOutcome::Complete { written } => {
                out.extend_from_slice(&chunk[..written]);
                return out;
            }
            WriteOutcome::BufferFull { written, needed } => {
                out.extend_from_slice(&chunk[..written]);
                if needed > chunk.len() {
                    chunk.resize(needed, 0);
                }
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Round trips

#[test]
fn every_shape_round_trips_under_every_option_set() {
    let value = everything();
    for options in OPTION_SETS {
        let codec = codec(options);
        let bytes = codec.encode(&value).unwrap();
        let back: Everything = codec.decode(&bytes).unwrap();

        assert!(back.flag);
        assert_eq!(back.letter, 'ß');
        assert_eq!(back.small, -3);
        assert_eq!(back.wide, -(1 << 100));
        assert_eq!(back.size, 12_345);
        assert_eq!(back.text, "héllo");
        assert_eq!(back.wait, Duration::new(5, 250));
        assert_eq!(back.maybe, Some(9));
        assert_eq!(back.nested, value.nested);
        assert_eq!(back.kind, Kind::Fancy);
        assert_eq!(back.fixed, [1, 2, 3]);
        assert_eq!(back.boxed, value.boxed);
        assert_eq!(back.list, value.list);
        assert_eq!(back.queue, value.queue);
        assert_eq!(back.chain, value.chain);
        assert_eq!(back.set, value.set);
        assert_eq!(back.table, value.table);
        assert!(back.empty.is_empty());

        let shape = back.shape.as_deref().unwrap();
        assert_eq!(concrete(shape).downcast_ref::<Circle>(), Some(&Circle { radius: 1.5 }));
        assert_eq!(back.shapes.len(), 2);
        assert_eq!(
            concrete(&*back.shapes[0]).downcast_ref::<Rect>(),
            Some(&Rect { w: 2.0, h: 3.0 })
        );
        assert_eq!(back.shapes[1].area(), value.shapes[1].area());

        assert_eq!(codec.encode(&back).unwrap(), bytes, "{options:?}");
    }
}

#[test]
fn hashed_containers_round_trip() {
    let mut lookup = HashMap::new();
    lookup.insert(1_u8, Some(Inner { id: 1, note: Some(String::from("x")) }));
    lookup.insert(2_u8, None);
    let tags: HashSet<String> = ["a", "b", "c"].into_iter().map(String::from).collect();

    for options in OPTION_SETS {
        let codec = codec(options);
        let bytes = codec.encode(&lookup).unwrap();
        assert_eq!(codec.decode::<HashMap<u8, Option<Inner>>>(&bytes).unwrap(), lookup);
        let bytes = codec.encode(&tags).unwrap();
        assert_eq!(codec.decode::<HashSet<String>>(&bytes).unwrap(), tags);
    }
}

#[test]
fn zero_length_collections_are_four_bytes() {
    let codec = codec(CodecOptions::empty());
    assert_eq!(codec.encode(&Vec::<String>::new()).unwrap(), [0, 0, 0, 0]);
    assert_eq!(codec.encode(&BTreeMap::<u8, u8>::new()).unwrap(), [0, 0, 0, 0]);
    assert_eq!(codec.encode(&String::new()).unwrap(), [0]);

    assert!(codec.decode::<Vec<Vec<u8>>>(&[0, 0, 0, 0]).unwrap().is_empty());
    assert!(codec.decode::<BTreeMap<u8, u8>>(&[0, 0, 0, 0]).unwrap().is_empty());
    assert_eq!(
        codec.decode::<[u8; 2]>(&[0, 0, 0, 0]),
        Err(CodecError::ArrayLength {
            context: crate::ErrorContext {
                type_path: Some(<[u8; 2] as TypePath>::type_path()),
                parent: None,
                member: None,
            },
            expected: 2,
            found: 0,
        })
    );
}

#[derive(Debug, Default, PartialEq)]
struct Node {
    label: u8,
    children: Vec<Node>,
}

impl_reflect_struct!(Node {
    label: u8,
    children: Vec<Node>,
});

#[test]
fn recursive_types_round_trip() {
    let mut node = Node::default();
    for label in 1..=10 {
        node = Node {
            label,
            children: vec![node, Node::default()],
        };
    }
    let codec = codec(CodecOptions::empty());
    let bytes = codec.encode(&node).unwrap();
    assert_eq!(codec.decode::<Node>(&bytes).unwrap(), node);
}

// -----------------------------------------------------------------------------
// Fragmentation

#[test]
fn chunked_reads_match_a_single_read() {
    let value = everything();
    for options in OPTION_SETS {
        let codec = codec(options);
        let bytes = codec.encode(&value).unwrap();
        let mut state = codec.read_state::<Everything>().unwrap();
        for size in 1..=bytes.len() {
            let back = read_in_chunks(&mut state, &bytes, size);
            assert_eq!(codec.encode_reflect(&*back).unwrap(), bytes, "chunk {size}");
            assert_eq!(state.depth(), 0);
        }
    }
}

#[test]
fn chunked_writes_match_a_single_write() {
    let value = everything();
    for options in OPTION_SETS {
        let codec = codec(options);
        let bytes = codec.encode(&value).unwrap();
        for size in 1..=bytes.len() {
            let mut state = codec.write_state(&value).unwrap();
            assert_eq!(write_in_chunks(&mut state, size), bytes, "chunk {size}");
        }
    }
}

#[test]
fn suspension_is_idempotent() {
    let codec = codec(CodecOptions::USE_PROPERTY_NAMES);
    let bytes = codec.encode(&everything()).unwrap();
    let mut state = codec.read_state::<Everything>().unwrap();

    let cut = bytes.len() / 2;
    let ReadOutcome::NeedMoreBytes { consumed, needed } = state.try_read(&bytes[..cut]).unwrap()
    else {
        panic!("value completed early");
    };
    for _ in 0..3 {
        assert!(matches!(
            state.try_read(&bytes[consumed..cut]).unwrap(),
            ReadOutcome::NeedMoreBytes { consumed: 0, needed: again } if again == needed
        ));
    }
    let ReadOutcome::Complete { value, .. } = state.try_read(&bytes[consumed..]).unwrap() else {
        panic!("value did not complete");
    };
    assert_eq!(codec.encode_reflect(&*value).unwrap(), bytes);
}

// -----------------------------------------------------------------------------
// Evolution

#[derive(Default)]
struct ProfileV2 {
    id: u32,
    history: Vec<BTreeMap<String, Option<u8>>>,
    name: String,
    avatar: Option<Box<dyn Shape>>,
    home: Option<Inner>,
    level: u16,
    score: i64,
}

impl_reflect_struct!(ProfileV2 {
    #[index = 0]
    id: u32,
    #[index = 5]
    history: Vec<BTreeMap<String, Option<u8>>>,
    #[index = 1]
    name: String,
    #[index = 6]
    avatar: Option<Box<dyn Shape>>,
    #[index = 7]
    home: Option<Inner>,
    #[index = 3]
    level: u16,
    #[index = 2]
    score: i64,
});

#[derive(Debug, Default, PartialEq)]
struct ProfileV1 {
    id: u32,
    name: String,
    score: i64,
    level: String,
}

impl_reflect_struct!(ProfileV1 {
    #[index = 0]
    id: u32,
    #[index = 1]
    name: String,
    #[index = 2]
    score: i64,
    #[index = 3]
    level: String,
});

fn profile() -> ProfileV2 {
    ProfileV2 {
        id: 11,
        history: vec![BTreeMap::from([(String::from("x"), Some(1)), (String::from("y"), None)])],
        name: String::from("ada"),
        avatar: Some(Box::new(Circle { radius: 2.0 })),
        home: Some(Inner {
            id: 3,
            note: Some(String::from("n")),
        }),
        level: 40,
        score: -7,
    }
}

#[test]
fn unknown_members_are_skipped() {
    let expected = ProfileV1 {
        id: 11,
        name: String::from("ada"),
        score: -7,
        // Arrived as `u16`, drained, default kept.
        level: String::new(),
    };
    for options in [
        CodecOptions::empty(),
        CodecOptions::USE_PROPERTY_NAMES,
        CodecOptions::INDEX_SIZE_UINT16,
    ] {
        let codec = codec(options);
        let bytes = codec.encode(&profile()).unwrap();
        assert_eq!(codec.decode::<ProfileV1>(&bytes).unwrap(), expected, "{options:?}");

        let mut state = codec.read_state::<ProfileV1>().unwrap();
        let back = read_in_chunks(&mut state, &bytes, 1);
        assert_eq!(back.take::<ProfileV1>().unwrap(), expected);
    }
}

#[test]
fn type_prefixes_are_verified() {
    let codec = codec(CodecOptions::INCLUDE_PROPERTY_TYPES);
    let bytes = codec.encode(&profile()).unwrap();
    assert!(matches!(
        codec.decode::<ProfileV1>(&bytes),
        Err(CodecError::TypeMismatch { expected, found, .. })
            if expected == <ProfileV1 as TypePath>::type_path()
                && found == <ProfileV2 as TypePath>::type_path()
    ));

    let bytes = codec.encode(&5_u16).unwrap();
    assert!(matches!(
        codec.decode::<i16>(&bytes),
        Err(CodecError::TypeMismatch { .. })
    ));
}

#[derive(Debug, Default, PartialEq)]
struct Reading {
    a: i32,
    b: i32,
    c: i32,
    child: Option<Inner>,
}

impl_reflect_struct!(Reading {
    a: i32,
    b: i32,
    c: i32,
    child: Option<Inner>,
});

#[derive(Debug, PartialEq)]
struct ReadingLite {
    a: i32,
    c: i32,
    child: Option<Inner>,
}

impl Default for ReadingLite {
    fn default() -> Self {
        Self {
            a: 0,
            c: 0,
            child: Some(Inner::default()),
        }
    }
}

impl_reflect_struct!(ReadingLite {
    a: i32,
    c: i32,
    child: Option<Inner>,
});

#[test]
fn named_members_survive_a_missing_target_member() {
    let codec = codec(CodecOptions::USE_PROPERTY_NAMES);
    let bytes = codec
        .encode(&Reading {
            a: 1,
            b: 2,
            c: 3,
            child: None,
        })
        .unwrap();
    assert_eq!(
        codec.decode::<ReadingLite>(&bytes).unwrap(),
        ReadingLite {
            a: 1,
            c: 3,
            child: None,
        }
    );
}

// -----------------------------------------------------------------------------
// Polymorphism

#[derive(Default)]
struct Gallery {
    shapes: Vec<Option<Box<dyn Shape>>>,
    hero: Option<Box<dyn Shape>>,
    count: u8,
}

impl_reflect_struct!(Gallery {
    shapes: Vec<Option<Box<dyn Shape>>>,
    hero: Option<Box<dyn Shape>>,
    count: u8,
});

fn gallery() -> Gallery {
    let triangle = || -> Box<dyn Shape> {
        Box::new(Triangle {
            base: 1.0,
            height: 2.0,
            label: String::from("t"),
        })
    };
    Gallery {
        shapes: vec![Some(Box::new(Circle { radius: 1.0 })), Some(triangle()), None],
        hero: Some(triangle()),
        count: 3,
    }
}

#[test]
fn unresolved_types_leave_nullable_slots_empty() {
    for options in OPTION_SETS {
        let codec = codec(options);
        let bytes = codec.encode(&gallery()).unwrap();
        let back: Gallery = codec.decode(&bytes).unwrap();

        assert_eq!(back.shapes.len(), 3);
        let first = back.shapes[0].as_deref().unwrap();
        assert!(concrete(first).is::<Circle>());
        assert!(back.shapes[1].is_none());
        assert!(back.shapes[2].is_none());
        assert!(back.hero.is_none());
        assert_eq!(back.count, 3);
    }
}

#[test]
fn fallback_stands_in_for_unresolved_types() {
    let mut registry = registry();
    registry.register_fallback::<Box<dyn Shape>, Blank>();
    let codec = Codec::new(registry);

    let bytes = codec.encode(&gallery()).unwrap();
    let back: Gallery = codec.decode(&bytes).unwrap();
    let second = back.shapes[1].as_deref().unwrap();
    assert!(concrete(second).is::<Blank>());
    assert_eq!(second.area(), 0.0);
    assert!(concrete(back.hero.as_deref().unwrap()).is::<Blank>());
    assert!(back.shapes[2].is_none());
    assert_eq!(back.count, 3);
}

#[test]
fn unresolved_mandatory_values_fail() {
    let codec = codec(CodecOptions::empty());
    let shapes: Vec<Box<dyn Shape>> = vec![Box::new(Triangle::default())];
    let bytes = codec.encode(&shapes).unwrap();
    assert!(matches!(
        codec.decode::<Vec<Box<dyn Shape>>>(&bytes),
        Err(CodecError::UnresolvedType { type_path, .. })
            if type_path == <Triangle as TypePath>::type_path()
    ));
}

#[test]
fn registered_non_implementations_are_rejected() {
    let mut registry = registry();
    registry.register::<Inner>();
    let codec = Codec::new(registry);

    let path = <Inner as TypePath>::type_path();
    let mut bytes = vec![path.len() as u8];
    bytes.extend_from_slice(path.as_bytes());
    bytes.push(0x20);
    assert!(matches!(
        codec.decode::<Box<dyn Shape>>(&bytes),
        Err(CodecError::TypeMismatch { found, .. }) if found == path
    ));
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[repr(u8)]
enum Dot {
    #[default]
    Small = 1,
    Large = 2,
}

impl_reflect_enum!(Dot: u8 { Small, Large });

impl Shape for Dot {
    fn area(&self) -> f64 {
        match self {
            Self::Small => 1.0,
            Self::Large => 4.0,
        }
    }
}

#[derive(Default)]
struct Pinboard {
    hero: Option<Box<dyn Shape>>,
    pins: Vec<Box<dyn Shape>>,
    count: u8,
    label: String,
}

impl_reflect_struct!(Pinboard {
    hero: Option<Box<dyn Shape>>,
    pins: Vec<Box<dyn Shape>>,
    count: u8,
    label: String,
});

fn pinboard() -> Pinboard {
    Pinboard {
        hero: Some(Box::new(Dot::Large)),
        pins: vec![Box::new(Circle { radius: 2.0 })],
        count: 7,
        label: String::from("x"),
    }
}

#[test]
fn unregistered_non_object_types_are_skipped() {
    for options in OPTION_SETS {
        let bytes = codec(options).encode(&pinboard()).unwrap();
        for size in [1, 3, bytes.len()] {
            let mut state = codec(options).read_state::<Pinboard>().unwrap();
            let back = read_in_chunks(&mut state, &bytes, size);
            let back = back.take::<Pinboard>().unwrap();
            assert!(back.hero.is_none(), "{options:?}");
            assert_eq!(back.pins.len(), 1);
            assert!(concrete(&*back.pins[0]).is::<Circle>());
            assert_eq!(back.count, 7);
            assert_eq!(back.label, "x");
        }
    }
}

#[test]
fn registered_non_object_types_round_trip() {
    let mut registry = registry();
    registry.register_implementation::<Box<dyn Shape>, Dot>();
    let codec = Codec::new(registry);

    let bytes = codec.encode(&pinboard()).unwrap();
    let back: Pinboard = codec.decode(&bytes).unwrap();
    let hero = back.hero.as_deref().unwrap();
    assert_eq!(concrete(hero).downcast_ref::<Dot>(), Some(&Dot::Large));
    assert_eq!(hero.area(), 4.0);
    assert_eq!(back.count, 7);

    // Root interface value: path, then the u8 descriptor, then the value.
    let root: Box<dyn Shape> = Box::new(Dot::Small);
    let bytes = codec.encode(&root).unwrap();
    let path = <Dot as TypePath>::type_path();
    let mut expected = vec![path.len() as u8];
    expected.extend_from_slice(path.as_bytes());
    expected.extend_from_slice(&[0x02, 0x01]);
    assert_eq!(bytes, expected);
}

// -----------------------------------------------------------------------------
// Limits and configuration errors

#[test]
fn depth_is_limited_on_read() {
    let codec = Codec::new(registry()).with_config(CodecConfig::default().with_max_depth(2));
    // [[[5]]]
    let bytes = [1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 5];
    assert!(matches!(
        codec.decode::<Vec<Vec<Vec<u8>>>>(&bytes),
        Err(CodecError::DepthExceeded { max_depth: 2, .. })
    ));
    // Empty inner lists stay within the limit.
    let bytes = [1, 0, 0, 0, 0, 0, 0, 0, 0];
    assert_eq!(codec.decode::<Vec<Vec<Vec<u8>>>>(&bytes).unwrap(), [Vec::<Vec<u8>>::new()]);
}

#[derive(Default)]
struct Window(Vec<u16>);

impl<'a> IntoIterator for &'a Window {
    type Item = &'a u16;
    type IntoIter = core::slice::Iter<'a, u16>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl_reflect_enumerable!(Window => u16);

#[derive(Default)]
struct Report {
    title: String,
    window: Window,
}

impl_reflect_struct!(Report {
    title: String,
    window: Window,
});

#[test]
fn enumerable_shapes_are_write_only() {
    let codec = codec(CodecOptions::empty());
    let report = Report {
        title: String::from("r"),
        window: Window(vec![1, 2]),
    };
    let bytes = codec.encode(&report).unwrap();
    // title, then window as a sequence of two u16.
    assert_eq!(
        bytes,
        [1, 0x11, 1, b'r', 2, 0x21, 0x04, 2, 0, 0, 0, 0, 1, 0, 0, 2, 0, 0]
    );

    let err = codec.read_state::<Report>().unwrap_err();
    assert_eq!(
        err,
        CodecError::WriteOnlyShape {
            type_path: <Window as TypePath>::type_path(),
            path: alloc::format!("{}.window", <Report as TypePath>::type_path()),
        }
    );
}

#[test]
fn malformed_input_is_rejected() {
    let codec = codec(CodecOptions::empty());
    assert!(matches!(
        codec.decode::<Kind>(&[9]),
        Err(CodecError::InvalidEnumValue { value: 9, .. })
    ));
    assert!(matches!(
        codec.decode::<Vec<u8>>(&[0xFF, 0xFF, 0xFF, 0xFF]),
        Err(CodecError::InvalidLength { length: -1, .. })
    ));
    assert!(matches!(
        codec.decode::<char>(&0xD800_u32.to_le_bytes()),
        Err(CodecError::InvalidChar { value: 0xD800, .. })
    ));
    assert!(matches!(
        codec.decode::<Vec<u8>>(&[1, 0, 0, 0, 1]),
        Err(CodecError::UnexpectedNull { .. })
    ));
    assert!(matches!(
        codec.decode::<Inner>(&[1, 0x7F]),
        Err(CodecError::InvalidWireKind { byte: 0x7F, .. })
    ));
}

#[test]
fn converters_are_shared_across_states() {
    let codec = codec(CodecOptions::empty());
    let before = crate::ConverterCache::global().get::<Everything>().unwrap();
    let _state = codec.read_state::<Everything>().unwrap();
    let after = crate::ConverterCache::global().get::<Everything>().unwrap();
    assert!(alloc::sync::Arc::ptr_eq(&before, &after));
    assert_eq!(<Everything as Typed>::type_info().type_path(), before.type_path());
}
