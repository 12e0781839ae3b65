#![cfg(feature = "host")]
#![allow(missing_docs)]
//! Host-level tests for the transfer descriptor and the hardware-driven
//! transfer lifecycle.

use wave_kit::playback::{DREQ_PWM_WRAP0, TransferDescriptor, TransferPhase};

const BUFFER_BASE: u32 = 0x2000_1000;
const COMPARE_REG: u32 = 0x4005_006c;
const SAMPLES: u32 = 200;
const SLICE: u8 = 5;

fn descriptor() -> TransferDescriptor {
    TransferDescriptor::new(BUFFER_BASE, COMPARE_REG, SAMPLES, SLICE)
}

#[test]
fn descriptor_paces_on_the_bound_slices_wrap() {
    let descriptor = descriptor();
    assert_eq!(descriptor.treq(), DREQ_PWM_WRAP0 + SLICE);
    assert_eq!(descriptor.element_count(), SAMPLES);
    assert_eq!(descriptor.read_addr(), BUFFER_BASE);
    assert_eq!(descriptor.write_addr(), COMPARE_REG);
}

#[test]
fn transfer_completes_after_exactly_n_triggers() {
    let descriptor = descriptor();
    let mut phase = TransferPhase::Armed;

    for pulse in 1..=SAMPLES {
        assert_ne!(
            phase,
            TransferPhase::Complete,
            "completed early at pulse {pulse}"
        );
        phase = phase.on_trigger(&descriptor);
    }
    assert_eq!(phase, TransferPhase::Complete);
}

#[test]
fn rearm_restores_the_full_transfer_at_offset_zero() {
    let descriptor = descriptor();
    let mut phase = TransferPhase::Armed;
    for _ in 0..SAMPLES {
        phase = phase.on_trigger(&descriptor);
    }

    let (rearmed, read_addr) = phase.acknowledge(&descriptor);
    assert_eq!(rearmed, TransferPhase::Armed);
    assert_eq!(read_addr, BUFFER_BASE, "re-arm must restart at the base");
    // The descriptor is reused verbatim: the next pass again moves all
    // elements. No drift, no partial restart.
    assert_eq!(descriptor.element_count(), SAMPLES);
}

#[test]
fn completed_transfer_ignores_further_triggers() {
    let descriptor = descriptor();
    let mut phase = TransferPhase::Armed;
    for _ in 0..SAMPLES {
        phase = phase.on_trigger(&descriptor);
    }
    assert_eq!(phase.on_trigger(&descriptor), TransferPhase::Complete);
}

#[test]
fn playback_loops_forever_over_the_same_descriptor() {
    let descriptor = descriptor();
    let mut phase = TransferPhase::Armed;
    let mut restarts = 0u32;

    for _ in 0..3 * SAMPLES {
        phase = phase.on_trigger(&descriptor);
        if phase == TransferPhase::Complete {
            let (rearmed, read_addr) = phase.acknowledge(&descriptor);
            assert_eq!(read_addr, BUFFER_BASE);
            phase = rearmed;
            restarts += 1;
        }
    }
    // 3·N pulses with a restart after each N-th: exactly three passes.
    assert_eq!(restarts, 3);
    assert_eq!(phase, TransferPhase::Armed);
}

#[test]
fn single_element_transfer_completes_on_the_first_trigger() {
    let descriptor = TransferDescriptor::new(BUFFER_BASE, COMPARE_REG, 1, 0);
    assert_eq!(
        TransferPhase::Armed.on_trigger(&descriptor),
        TransferPhase::Complete
    );
}
