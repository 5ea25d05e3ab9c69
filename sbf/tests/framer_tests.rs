use proptest::prelude::*;
use sbf::{encode_frame, match_block, BlockRef, Framer, FramerEvent, DOP, PVT_GEODETIC};

mod block_generator;
use block_generator::PvtGeodetic;

fn collect_blocks(framer: &mut Framer, bytes: &[u8]) -> Vec<(u16, Vec<u8>)> {
    let mut blocks = vec![];
    for b in bytes {
        if let Some(Ok(FramerEvent::Block { block_id, payload })) = framer.consume(*b) {
            blocks.push((block_id, payload.to_vec()));
        }
    }
    blocks
}

#[test]
fn pvt_fields_survive_framing() {
    let pvt = PvtGeodetic::default();
    let mut framer = Framer::new();
    let blocks = collect_blocks(&mut framer, &pvt.to_frame());
    assert_eq!(blocks.len(), 1);

    let (block_id, payload) = &blocks[0];
    assert_eq!(*block_id, PVT_GEODETIC);
    let BlockRef::PvtGeodetic(decoded) = match_block(*block_id, payload).unwrap() else {
        panic!("wrong block kind");
    };
    assert_eq!(decoded.tow(), pvt.tow);
    assert_eq!(decoded.wnc(), pvt.wnc);
    assert_eq!(decoded.mode(), pvt.mode);
    assert_eq!(decoded.latitude(), pvt.latitude);
    assert_eq!(decoded.longitude(), pvt.longitude);
    assert_eq!(decoded.height(), pvt.height);
    assert_eq!(decoded.nr_sv(), pvt.nr_sv);
    assert_eq!(decoded.h_accuracy(), pvt.h_accuracy);
    assert_eq!(decoded.v_accuracy(), pvt.v_accuracy);
}

#[test]
fn echo_interleaved_with_blocks() {
    let mut bytes = b"$R: spm,Rover,all\r\n".to_vec();
    bytes.extend_from_slice(&encode_frame(DOP, &[0u8; 24]));
    bytes.extend_from_slice(b"$R? invalid\n");
    bytes.extend_from_slice(&PvtGeodetic::default().to_frame());

    let mut framer = Framer::new();
    let mut echoes = vec![];
    let mut blocks = vec![];
    for b in &bytes {
        match framer.consume(*b) {
            Some(Ok(FramerEvent::CommandEcho(line))) => echoes.push(line.to_vec()),
            Some(Ok(FramerEvent::Block { block_id, .. })) => blocks.push(block_id),
            _ => {},
        }
    }
    assert_eq!(echoes.len(), 2);
    assert_eq!(echoes[0], b": spm,Rover,all\r");
    assert_eq!(echoes[1], b"? invalid");
    assert_eq!(blocks, vec![DOP, PVT_GEODETIC]);
}

#[test]
fn back_to_back_frames() {
    let mut bytes = encode_frame(DOP, &[0u8; 24]);
    bytes.extend_from_slice(&encode_frame(DOP, &[1u8; 24]));
    bytes.extend_from_slice(&encode_frame(DOP, &[2u8; 24]));
    let mut framer = Framer::new();
    let blocks = collect_blocks(&mut framer, &bytes);
    assert_eq!(blocks.len(), 3);
    assert_eq!(blocks[2].1, vec![2u8; 24]);
    assert_eq!(framer.crc_error_count(), 0);
}

proptest! {
    /// A frame following arbitrary non-preamble noise is always recovered.
    #[test]
    fn garbage_without_preamble_never_hides_a_frame(
        garbage in proptest::collection::vec(
            any::<u8>().prop_filter("no preamble byte", |b| *b != 0x24),
            0..256,
        ),
    ) {
        let mut bytes = garbage;
        bytes.extend_from_slice(&PvtGeodetic::default().to_frame());
        let mut framer = Framer::new();
        let blocks = collect_blocks(&mut framer, &bytes);
        prop_assert_eq!(blocks.len(), 1);
        prop_assert_eq!(blocks[0].0, PVT_GEODETIC);
    }

    /// A preamble byte followed by anything that is not a frame or response
    /// marker re-arms the search instead of wedging the framer.
    #[test]
    fn false_preamble_pair_resyncs(
        second in any::<u8>().prop_filter(
            "not a frame marker",
            |b| !matches!(*b, 0x24 | 0x40 | b'R'),
        ),
    ) {
        let mut bytes = vec![0x24, second];
        bytes.extend_from_slice(&PvtGeodetic::default().to_frame());
        let mut framer = Framer::new();
        let blocks = collect_blocks(&mut framer, &bytes);
        prop_assert_eq!(blocks.len(), 1);
    }

    /// Every generated field comes back out of the accessors bit-exact.
    #[test]
    fn random_pvt_fields_roundtrip(
        tow in any::<u32>(),
        wnc in 0u16..4000,
        latitude in -1.55f64..1.55,
        longitude in -3.1f64..3.1,
        height in -100.0f64..9000.0,
        vn in -100.0f32..100.0,
        ve in -100.0f32..100.0,
        vu in -50.0f32..50.0,
        nr_sv in 0u8..64,
        mean_corr_age in 0u16..6000,
    ) {
        let pvt = PvtGeodetic {
            tow,
            wnc,
            latitude,
            longitude,
            height,
            vn,
            ve,
            vu,
            nr_sv,
            mean_corr_age,
            ..Default::default()
        };
        let mut framer = Framer::new();
        let blocks = collect_blocks(&mut framer, &pvt.to_frame());
        prop_assert_eq!(blocks.len(), 1);

        let BlockRef::PvtGeodetic(decoded) =
            match_block(blocks[0].0, &blocks[0].1).unwrap()
        else {
            panic!("wrong block kind");
        };
        prop_assert_eq!(decoded.tow(), tow);
        prop_assert_eq!(decoded.wnc(), wnc);
        prop_assert_eq!(decoded.latitude(), latitude);
        prop_assert_eq!(decoded.longitude(), longitude);
        prop_assert_eq!(decoded.height(), height);
        prop_assert_eq!(decoded.vn(), vn);
        prop_assert_eq!(decoded.ve(), ve);
        prop_assert_eq!(decoded.vu(), vu);
        prop_assert_eq!(decoded.nr_sv(), nr_sv);
        prop_assert_eq!(decoded.mean_corr_age(), mean_corr_age);
    }
}
