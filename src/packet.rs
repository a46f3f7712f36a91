//! Packing digital residues into 32-bit packets: 15 2-bit residues or 6 5-bit
//! residues per packet, with bit 31 marking the last packet of a sequence and
//! bit 30 selecting the packing mode.

use crate::alphabet::{is_canonical, SENTINEL};

/// Bit 31: set on the last packet of a sequence.
pub const EOD_BIT: u32 = 1 << 31;
/// Bit 30: set when the packet carries 6 5-bit residues instead of 15 2-bit ones.
pub const MODE_BIT: u32 = 1 << 30;

/// Pack `residues` using 5-bit codes exclusively (protein sequences always
/// pack this way). Produces `ceil((n + 1) / 6)` packets, so even an empty
/// sequence yields one EOD packet of six sentinel codes.
pub fn pack5(residues: &[u8]) -> Vec<u32> {
    let n = residues.len();
    let npackets = (n + 1).div_ceil(6);
    let mut packets = Vec::with_capacity(npackets);
    let mut r = 0usize;

    for pos in 0..npackets {
        let mut v = MODE_BIT;
        for slot in 0..6 {
            let code = if r < n {
                let c = residues[r];
                r += 1;
                c
            } else {
                SENTINEL
            };
            let shift = 25 - 5 * slot;
            v |= u32::from(code) << shift;
        }
        if pos == npackets - 1 {
            v |= EOD_BIT;
        }
        packets.push(v);
    }

    packets
}

/// Pack `residues` using a mix of 2-bit and 5-bit packets: runs of canonical
/// residues (codes 0..3) pack 15-to-a-packet at 2 bits each; a run containing
/// a degenerate residue within its next 15-residue window instead packs 6-to-
/// a-packet at 5 bits each. Always produces at least one packet, ending with
/// exactly one EOD packet.
pub fn pack2(residues: &[u8]) -> Vec<u32> {
    let n = residues.len();
    let mut packets = Vec::new();
    let mut r = 0usize;

    // Position of the next degenerate residue at or after `r`, or `n` if none remains.
    let mut d = 0usize;
    while d < n && is_canonical(residues[d]) {
        d += 1;
    }

    loop {
        if d < r {
            d = r;
            while d < n && is_canonical(residues[d]) {
                d += 1;
            }
        }

        let remaining = n - r;
        let mut v;
        if remaining >= 15 && d >= r + 15 {
            v = 0u32;
            for slot in 0..15 {
                let shift = 28 - 2 * slot;
                v |= u32::from(residues[r]) << shift;
                r += 1;
            }
        } else {
            v = MODE_BIT;
            for slot in 0..6 {
                let code = if r < n {
                    let c = residues[r];
                    r += 1;
                    c
                } else {
                    SENTINEL
                };
                let shift = 25 - 5 * slot;
                v |= u32::from(code) << shift;
            }
        }

        let done = r >= n;
        if done {
            v |= EOD_BIT;
        }
        packets.push(v);
        if done {
            break;
        }
    }

    packets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unpack_5bit(packets: &[u32]) -> Vec<u8> {
        let mut out = Vec::new();
        for &v in packets {
            debug_assert_eq!(v & MODE_BIT, MODE_BIT);
            let eod = v & EOD_BIT != 0;
            let mut stopped = false;
            for slot in 0..6 {
                let shift = 25 - 5 * slot;
                let code = ((v >> shift) & 0b1_1111) as u8;
                if eod && code == SENTINEL {
                    stopped = true;
                    break;
                }
                out.push(code);
            }
            let _ = stopped;
        }
        out
    }

    #[test]
    fn pack5_tiny_protein_s1() {
        // S1: "ACDE" -> codes 0,1,2,3 under some made-up protein encoding.
        let residues = [0u8, 1, 2, 3];
        let packets = pack5(&residues);
        assert_eq!(packets.len(), 1);
        let v = packets[0];
        assert_eq!(v & EOD_BIT, EOD_BIT);
        assert_eq!(v & MODE_BIT, MODE_BIT);
        assert_eq!(unpack_5bit(&packets), residues);
    }

    #[test]
    fn pack5_empty_sequence_s4() {
        let packets = pack5(&[]);
        assert_eq!(packets.len(), 1);
        assert_eq!(packets[0] & EOD_BIT, EOD_BIT);
        assert!(unpack_5bit(&packets).is_empty());
    }

    #[test]
    fn pack5_packet_count_formula() {
        for n in 0..40 {
            let residues = vec![0u8; n];
            let packets = pack5(&residues);
            assert_eq!(packets.len(), (n + 1).div_ceil(6));
            for (i, &v) in packets.iter().enumerate() {
                assert_eq!(v & MODE_BIT, MODE_BIT);
                let is_last = i + 1 == packets.len();
                assert_eq!(v & EOD_BIT != 0, is_last);
            }
        }
    }

    #[test]
    fn pack2_pure_canonical_s2() {
        let residues = vec![0u8; 30];
        let packets = pack2(&residues);
        assert_eq!(packets.len(), 2);
        assert_eq!(packets[0] & MODE_BIT, 0);
        assert_eq!(packets[1] & MODE_BIT, 0);
        assert_eq!(packets[0] & EOD_BIT, 0);
        assert_eq!(packets[1] & EOD_BIT, EOD_BIT);
    }

    #[test]
    fn pack2_mixed_with_degenerate_s3() {
        // A C G T A C G T N N A -> codes 0 1 2 3 0 1 2 3 4 4 0 (4 = degenerate)
        let residues = [0u8, 1, 2, 3, 0, 1, 2, 3, 4, 4, 0];
        let packets = pack2(&residues);
        assert_eq!(packets[0] & MODE_BIT, MODE_BIT);
        assert_eq!(packets.last().unwrap() & EOD_BIT, EOD_BIT);

        let mut decoded = Vec::new();
        for &v in &packets {
            if v & MODE_BIT == 0 {
                for slot in 0..15 {
                    let shift = 28 - 2 * slot;
                    decoded.push(((v >> shift) & 0b11) as u8);
                }
            } else {
                let eod = v & EOD_BIT != 0;
                for slot in 0..6 {
                    let shift = 25 - 5 * slot;
                    let code = ((v >> shift) & 0b1_1111) as u8;
                    if eod && code == SENTINEL {
                        break;
                    }
                    decoded.push(code);
                }
            }
        }
        assert_eq!(decoded, residues);
    }

    #[test]
    fn pack2_empty_sequence() {
        let packets = pack2(&[]);
        assert_eq!(packets.len(), 1);
        assert_eq!(packets[0] & EOD_BIT, EOD_BIT);
    }
}
