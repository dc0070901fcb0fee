use rug::Integer;

use crate::{Ciphertext, DecryptionMode, Error, Paillier, Result};

/// Packs `width`-bit ciphertexts into the slots of wider ciphertexts.
///
/// A packet holds up to k = floor(bitlength(n) / width) values. The first
/// value of a group lands in the most significant slot:
///
/// (x0, x1, ..., xn) -> X0 = x0 || ... || x(k-1), X1 = xk || ... || x(2k-1), ...
///
/// Slot overflow is not checked: every packed value and every result of a
/// homomorphic operation on packets must stay below 2^width, and a full
/// packet must stay below n.
pub struct Packer<'a> {
    paillier: &'a Paillier,
    width: u32,
    slots: usize,
    shift: Integer,
}

impl<'a> Packer<'a> {
    /// Instantiates a new [Packer].
    ///
    /// # Arguments
    ///
    /// * `paillier`: the cryptosystem, a public instance suffices for [Self::pack].
    /// * `width`: bit width of a slot, in \[1, bitlength(n)).
    pub fn new(paillier: &'a Paillier, width: u32) -> Result<Self> {
        let modulus_bits: u32 = paillier.public_key().bits();
        if width == 0 || width >= modulus_bits {
            return Err(Error::PackingWidthMismatch { width, modulus_bits });
        }
        Ok(Self {
            paillier,
            width,
            slots: (modulus_bits / width) as usize,
            shift: Integer::from(1) << width,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of slots k of a packet.
    pub fn slots(&self) -> usize {
        self.slots
    }

    /// Number of packets needed for `count` values.
    pub fn packets(&self, count: usize) -> usize {
        count.div_ceil(self.slots)
    }

    /// Packs `values` into ceil(len / k) ciphertexts by folding each group
    /// of k as acc = acc * 2^width + v.
    ///
    /// A final partial group occupies the least significant slots; the
    /// caller keeps track of `values.len()`.
    pub fn pack(&self, values: &[Ciphertext]) -> Result<Vec<Ciphertext>> {
        values
            .chunks(self.slots)
            .map(|group| {
                let mut acc: Ciphertext = group[0].clone();
                for v in &group[1..] {
                    acc = self.paillier.scalar_multiply(&acc, &self.shift)?;
                    acc = self.paillier.add(&acc, v)?;
                }
                Ok(acc)
            })
            .collect()
    }

    /// Decrypts one packet and splits it into k values, least significant
    /// slot first (reverse packing order).
    pub fn unpack(&self, packed: &Ciphertext) -> Result<Vec<Integer>> {
        let mut value: Integer = self.paillier.decrypt_raw(packed, DecryptionMode::Crt)?;
        let mut res: Vec<Integer> = Vec::with_capacity(self.slots);
        (0..self.slots).for_each(|_| {
            res.push(Integer::from(value.keep_bits_ref(self.width)));
            value >>= self.width;
        });
        Ok(res)
    }

    /// Unpacks a sequence of packets produced by [Self::pack] from `count`
    /// values and returns them in their original order.
    ///
    /// Each packet is unpacked and reversed; of the final packet only its
    /// `count mod k` least significant slots are kept. Packets beyond
    /// those needed for `count` values are ignored.
    pub fn unpack_all(&self, packed: &[Ciphertext], count: usize) -> Result<Vec<Integer>> {
        let mut res: Vec<Integer> = Vec::with_capacity(count);
        let mut remaining: usize = count;
        for p in packed {
            if remaining == 0 {
                break;
            }
            let mut values: Vec<Integer> = self.unpack(p)?;
            values.reverse();
            if remaining >= self.slots {
                remaining -= self.slots;
                res.extend(values);
            } else {
                res.extend(values.drain(self.slots - remaining..));
                remaining = 0;
            }
        }
        Ok(res)
    }
}
