/// Round `offset` up to the next multiple of `granularity`.
///
/// `granularity` must be non-zero. Offsets already on a boundary are
/// returned unchanged.
#[inline]
pub fn align_up(offset: u64, granularity: u64) -> u64 {
    offset.div_ceil(granularity) * granularity
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::ALIGNMENT;

    #[test]
    fn test_align_up() {
        assert_eq!(align_up(0, ALIGNMENT), 0);
        assert_eq!(align_up(1, ALIGNMENT), 2048);
        assert_eq!(align_up(0x40 + 0x100, ALIGNMENT), 2048);
        assert_eq!(align_up(2048, ALIGNMENT), 2048);
        assert_eq!(align_up(2049, ALIGNMENT), 4096);
        assert_eq!(align_up(7, 4), 8);
    }
}
