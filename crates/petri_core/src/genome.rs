//! Gene decoding and genome-level operations.
//!
//! A gene's 32 bits split into a source byte, a sink byte and a 16-bit
//! weight field. Decoded indices fold modulo the relevant neuron count, so
//! any random bit pattern wires to a real neuron and every genome yields a
//! valid, if arbitrary, network.

use crate::brain::NetworkShape;
use petri_data::{ConnectionDescriptor, Gene, Genome, SinkKind, SourceKind};
use rand::Rng;

/// Top bit of the source and sink bytes selects the neuron class.
const KIND_BIT: u8 = 0x80;
/// Remaining seven bits carry the pre-fold index.
const INDEX_MASK: u8 = 0x7F;
/// Fixed-point scale of the decoded weight, giving a range of roughly
/// [-4.0, 4.0) at 1/8192 resolution.
const WEIGHT_SCALE: f32 = 8192.0;

/// Genome-level operations, implemented for [`petri_data::Genome`].
pub trait GenomeLogic: Sized {
    fn new_random_with_rng<R: Rng>(length: usize, rng: &mut R) -> Self;
    fn new_random(length: usize) -> Self;
    fn crossover_with_rng<R: Rng>(&self, other: &Self, rng: &mut R) -> Self;
}

impl GenomeLogic for Genome {
    fn new_random_with_rng<R: Rng>(length: usize, rng: &mut R) -> Self {
        Self((0..length).map(|_| Gene::from_bits(rng.gen())).collect())
    }

    fn new_random(length: usize) -> Self {
        let mut rng = rand::thread_rng();
        Self::new_random_with_rng(length, &mut rng)
    }

    /// Gene-wise uniform crossover: every child gene is drawn independently
    /// from one of the two parents at the same position. No mutation
    /// operator is applied.
    fn crossover_with_rng<R: Rng>(&self, other: &Self, rng: &mut R) -> Self {
        debug_assert_eq!(self.len(), other.len(), "parents share genome length");
        Self(
            self.genes()
                .iter()
                .zip(other.genes())
                .map(|(a, b)| if rng.gen_bool(0.5) { *a } else { *b })
                .collect(),
        )
    }
}

/// Decodes one gene into a connection descriptor for the given network
/// shape. Pure: the same gene and shape always yield the same descriptor.
#[must_use]
pub fn decode(gene: Gene, shape: &NetworkShape) -> ConnectionDescriptor {
    let bits = gene.bits();
    let source_byte = (bits >> 24) as u8;
    let sink_byte = (bits >> 16) as u8;
    let weight_field = bits as u16;

    let (source, source_index) = if source_byte & KIND_BIT == 0 {
        (
            SourceKind::Sensory,
            usize::from(source_byte & INDEX_MASK) % shape.sensory,
        )
    } else {
        (
            SourceKind::Internal,
            usize::from(source_byte & INDEX_MASK) % shape.internal,
        )
    };

    let (sink, sink_index) = if sink_byte & KIND_BIT == 0 {
        (
            SinkKind::Action,
            usize::from(sink_byte & INDEX_MASK) % shape.action,
        )
    } else {
        (
            SinkKind::Internal,
            usize::from(sink_byte & INDEX_MASK) % shape.internal,
        )
    };

    ConnectionDescriptor {
        source,
        source_index,
        sink,
        sink_index,
        weight: decode_weight(weight_field),
    }
}

/// Fixed-point signed weight recovery, not two's-complement: fields at or
/// above 32768 carry the sign, with the magnitude wrapping so that exactly
/// 32768 maps to 0.0 rather than -4.0.
fn decode_weight(field: u16) -> f32 {
    let v = i32::from(field);
    let signed = if v >= 32768 {
        -((32768 - (v % 32768)) % 32768)
    } else {
        v
    };
    signed as f32 / WEIGHT_SCALE
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn shape() -> NetworkShape {
        NetworkShape::with_internal(4)
    }

    #[test]
    fn test_decode_weight_boundaries() {
        assert_eq!(decode_weight(0), 0.0);
        assert_eq!(decode_weight(32767), 32767.0 / 8192.0);
        assert_eq!(decode_weight(32768), 0.0);
        assert_eq!(decode_weight(65535), -1.0 / 8192.0);
        assert_eq!(decode_weight(8192), 1.0);
        assert_eq!(decode_weight(32769), -32767.0 / 8192.0);
    }

    #[test]
    fn test_decode_is_deterministic() {
        let gene = Gene::from_bits(0x5aa5_c33c);
        assert_eq!(decode(gene, &shape()), decode(gene, &shape()));
    }

    #[test]
    fn test_index_folding_all_byte_values() {
        let shape = shape();
        for byte in 0u32..=255 {
            let gene = Gene::from_bits((byte << 24) | (byte << 16));
            let conn = decode(gene, &shape);
            match conn.source {
                SourceKind::Sensory => assert!(conn.source_index < shape.sensory),
                SourceKind::Internal => assert!(conn.source_index < shape.internal),
            }
            match conn.sink {
                SinkKind::Action => assert!(conn.sink_index < shape.action),
                SinkKind::Internal => assert!(conn.sink_index < shape.internal),
            }
        }
    }

    #[test]
    fn test_decode_field_split() {
        // source 0x81 -> internal neuron 1, sink 0x02 -> action 2, weight 1.0
        let conn = decode(Gene::from_bits(0x8102_2000), &shape());
        assert_eq!(conn.source, SourceKind::Internal);
        assert_eq!(conn.source_index, 1);
        assert_eq!(conn.sink, SinkKind::Action);
        assert_eq!(conn.sink_index, 2);
        assert_eq!(conn.weight, 1.0);
    }

    #[test]
    fn test_random_genome_has_configured_length() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let genome = Genome::new_random_with_rng(8, &mut rng);
        assert_eq!(genome.len(), 8);
    }

    #[test]
    fn test_crossover_draws_each_gene_from_a_parent() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let a = Genome::new_random_with_rng(16, &mut rng);
        let b = Genome::new_random_with_rng(16, &mut rng);
        let child = a.crossover_with_rng(&b, &mut rng);

        assert_eq!(child.len(), 16);
        for (i, gene) in child.genes().iter().enumerate() {
            assert!(*gene == a.genes()[i] || *gene == b.genes()[i]);
        }
    }
}
