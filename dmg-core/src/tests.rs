use crate::dmg::{Dmg, VideoConfig};
use crate::memory::device::Addressable;
use crate::memory::registers::{IF_ADDR, Interrupt};
use crate::video::registers::{LcdMode, LcdStat, Quirks};
use crate::video::tile::FourShade;
use crate::video::{
    BG_MAP_ADDR, BGP_ADDR, CYCLES_PER_FRAME, CYCLES_PER_LINE, LCDC_ADDR, LINES_PER_FRAME, LY_ADDR, LYC_ADDR,
    SCREEN_HEIGHT, SCREEN_WIDTH, SCY_ADDR, STAT_ADDR, Shade,
};
use proptest::prelude::*;

fn dmg_with_display() -> Dmg {
    let mut dmg = Dmg::new();
    dmg.write(LCDC_ADDR, 0x80).unwrap();
    dmg
}

/// Splits `total` at the given cut points into consecutive step sizes.
fn split(total: u32, cuts: Vec<u32>) -> Vec<u32> {
    let mut cuts: Vec<u32> = cuts.into_iter().map(|cut| cut % (total + 1)).collect();
    cuts.sort_unstable();

    let mut previous = 0;
    let mut steps = Vec::with_capacity(cuts.len() + 1);
    for cut in cuts {
        steps.push(cut - previous);
        previous = cut;
    }
    steps.push(total - previous);
    steps
}

fn line_phase(mode: LcdMode) -> u8 {
    match mode {
        LcdMode::OamScan => 0,
        LcdMode::Transfer => 1,
        LcdMode::HBlank => 2,
        LcdMode::VBlank => 3,
    }
}

proptest! {
    #[test]
    fn any_grouping_of_one_line_advances_ly_once(cuts in prop::collection::vec(0u32..=CYCLES_PER_LINE, 0..24)) {
        let mut dmg = Dmg::new();
        let mut phase = line_phase(dmg.lcd.mode());

        for cycles in split(CYCLES_PER_LINE, cuts) {
            dmg.step(cycles);
            if dmg.lcd.ly() == 0 {
                let next = line_phase(dmg.lcd.mode());
                prop_assert!(next >= phase);
                phase = next;
            }
        }

        prop_assert_eq!(dmg.lcd.ly(), 1);
        prop_assert_eq!(dmg.lcd.mode(), LcdMode::OamScan);
        prop_assert_eq!(dmg.lcd.cycles(), 0);
    }

    #[test]
    fn any_grouping_of_a_frame_presents_once(cuts in prop::collection::vec(0u32..=CYCLES_PER_FRAME, 0..64)) {
        let mut dmg = dmg_with_display();
        let frames = dmg.subscribe();
        let mut vblanks = 0;

        for cycles in split(CYCLES_PER_FRAME, cuts) {
            dmg.step(cycles);
            if !dmg.interrupts.acknowledge(Interrupt::VBLANK).is_empty() {
                vblanks += 1;
            }
        }

        prop_assert_eq!(vblanks, 1);
        prop_assert_eq!(frames.len(), 1);
        prop_assert_eq!(dmg.lcd.ly(), 0);
        prop_assert_eq!(dmg.lcd.mode(), LcdMode::OamScan);
    }
}

#[test]
fn coincidence_tracks_lyc_for_every_value() {
    for lyc in 0..=u8::MAX {
        let mut dmg = Dmg::new();
        dmg.write(LYC_ADDR, lyc).unwrap();
        let mut matched = false;

        for _ in 0..LINES_PER_FRAME {
            dmg.step(0);
            let coincidence = dmg.lcd.stat().contains(LcdStat::COINCIDENCE_FLAG);
            assert_eq!(coincidence, dmg.lcd.ly() == lyc, "lyc={} ly={}", lyc, dmg.lcd.ly());
            matched |= coincidence;
            dmg.step(CYCLES_PER_LINE);
        }

        assert_eq!(matched, (lyc as usize) < LINES_PER_FRAME, "lyc={}", lyc);
    }
}

#[test]
fn disabled_display_keeps_timing_but_presents_nothing() {
    let mut dmg = Dmg::new();
    let frames = dmg.subscribe();

    for _ in 0..3 {
        dmg.step(CYCLES_PER_LINE * 144);
        assert_eq!(dmg.lcd.ly(), 144);
        assert!(!dmg.interrupts.acknowledge(Interrupt::VBLANK).is_empty());
        dmg.step(CYCLES_PER_LINE * 10);
    }

    assert!(frames.try_recv().is_err());
    assert_eq!(dmg.ppu.frames_emitted(), 0);
}

#[test]
fn presented_frame_carries_the_background() {
    let mut dmg = dmg_with_display();
    let frames = dmg.subscribe();
    // tile 1: solid on its first row only
    dmg.write(0x8010, 0xFF).unwrap();
    dmg.write(0x8011, 0xFF).unwrap();
    // map row 2, slot 19
    dmg.write(BG_MAP_ADDR + 2 * 32 + 19, 1).unwrap();

    dmg.step(CYCLES_PER_FRAME);

    let frame = frames.try_recv().expect("frame presented");
    for y in 0..SCREEN_HEIGHT {
        for x in 0..SCREEN_WIDTH {
            let dark = y == 16 && x >= 152;
            assert_eq!(frame[y][x].is_dark(), dark, "pixel {}, {}", x, y);
        }
    }
}

#[test]
fn scroll_is_sampled_per_line() {
    let mut dmg = dmg_with_display();
    let frames = dmg.subscribe();
    dmg.write(0x8000, 0xFF).unwrap(); // tile 0, row 0

    dmg.step(CYCLES_PER_LINE * 8);
    dmg.write(SCY_ADDR, 1).unwrap();
    dmg.step(CYCLES_PER_FRAME - CYCLES_PER_LINE * 8);

    let frame = frames.try_recv().expect("frame presented");
    let dark_rows: Vec<usize> = (0..SCREEN_HEIGHT).filter(|&y| frame[y][0].is_dark()).collect();
    // unscrolled rows 0..8 hit row 0 of tile 0 once, later rows hit it at (y + 1) % 8 == 0
    let expected: Vec<usize> = (0..SCREEN_HEIGHT).filter(|&y| if y < 8 { y == 0 } else { (y + 1) % 8 == 0 }).collect();
    assert_eq!(dark_rows, expected);
}

#[test]
fn four_shade_palette_through_config() {
    let config = VideoConfig {
        quirks: Quirks::default(),
        palette: Box::new(FourShade),
    };
    let mut dmg = Dmg::with_bus(crate::memory::mmio::Mmio::new(), config);
    dmg.write(LCDC_ADDR, 0x80).unwrap();
    dmg.write(BGP_ADDR, 0xE4).unwrap();
    dmg.write(0x8000, 0xFF).unwrap();
    let frames = dmg.subscribe();

    dmg.step(CYCLES_PER_FRAME);

    let frame = frames.try_recv().expect("frame presented");
    assert_eq!(frame[0][0], Shade::LightGray);
    assert_eq!(frame[1][0], Shade::White);
}

#[test]
fn registers_route_to_their_owners() {
    let mut dmg = Dmg::new();
    dmg.step(CYCLES_PER_LINE * 3);

    assert_eq!(dmg.read(LY_ADDR).unwrap(), 3);
    dmg.write(LY_ADDR, 0x55).unwrap();
    assert_eq!(dmg.read(LY_ADDR).unwrap(), 0);

    dmg.write(STAT_ADDR, 0x40).unwrap();
    assert_eq!(dmg.lcd.stat() & LcdStat::WRITABLE, LcdStat::LYC_IRQ_ENABLE);

    dmg.write(IF_ADDR, 0x01).unwrap();
    assert_eq!(dmg.interrupts.pending(), Interrupt::VBLANK);
    assert_eq!(dmg.read(IF_ADDR).unwrap(), 0xE1);

    dmg.write(SCY_ADDR, 0x12).unwrap();
    assert_eq!(dmg.read(SCY_ADDR).unwrap(), 0x12);
}

#[test]
fn power_on_resets_state() {
    let mut dmg = dmg_with_display();
    dmg.write(LYC_ADDR, 9).unwrap();
    dmg.step(CYCLES_PER_FRAME + CYCLES_PER_LINE * 20);

    dmg.power_on();

    assert_eq!(dmg.lcd.ly(), 0);
    assert_eq!(dmg.lcd.lyc(), 0);
    assert_eq!(dmg.lcd.mode(), LcdMode::OamScan);
    assert_eq!(dmg.ppu.frames_emitted(), 0);
    assert!(dmg.interrupts.pending().is_empty());
}

#[test]
fn slow_consumer_receives_the_latest_frame() {
    let mut dmg = dmg_with_display();
    let frames = dmg.subscribe();

    dmg.step(CYCLES_PER_FRAME);
    dmg.write(0x8000, 0xFF).unwrap();
    dmg.step(CYCLES_PER_FRAME);

    assert_eq!(dmg.ppu.frames_emitted(), 2);
    let frame = frames.try_recv().expect("frame presented");
    assert!(frame[0].iter().all(|shade| shade.is_dark()));
    assert!(frames.try_recv().is_err());
}

#[test]
fn registers_restored_from_loaded_image() {
    let mut dmg = Dmg::new();
    let mut image = vec![0u8; 0x10000];
    image[STAT_ADDR as usize] = 0x47;
    image[LYC_ADDR as usize] = 9;
    image[LY_ADDR as usize] = 42;
    image[IF_ADDR as usize] = 0x02;
    dmg.load(0x0000, &image);

    dmg.power_on();
    dmg.restore_registers().unwrap();

    assert_eq!(dmg.lcd.lyc(), 9);
    assert_eq!(dmg.lcd.stat() & LcdStat::WRITABLE, LcdStat::LYC_IRQ_ENABLE);
    assert_eq!(dmg.lcd.mode(), LcdMode::OamScan);
    assert_eq!(dmg.lcd.ly(), 0);
    assert_eq!(dmg.interrupts.pending(), Interrupt::LCD_STAT);
    assert_eq!(dmg.mmio.read(LY_ADDR), 42);
}
