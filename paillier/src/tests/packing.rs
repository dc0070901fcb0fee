use itertools::izip;
use rand::Rng;
use rug::Integer;
use sampling::source::Source;

use crate::tests::test_paillier;
use crate::{Ciphertext, Error, Packer, Paillier};

fn encrypt_all(paillier: &Paillier, values: &[u64], source: &mut Source) -> Vec<Ciphertext> {
    values
        .iter()
        .map(|v| paillier.encrypt(&Integer::from(*v), source).unwrap())
        .collect()
}

#[test]
fn pack_three_bytes_into_one_packet() {
    let paillier: Paillier = test_paillier(512, 0);
    let mut source: Source = Source::new([1u8; 32]);
    let packer: Packer = Packer::new(&paillier, 8).unwrap();
    assert_eq!(packer.slots(), 64);

    let values: [u64; 3] = [200, 5, 130];
    let packed: Vec<Ciphertext> = packer.pack(&encrypt_all(&paillier, &values, &mut source)).unwrap();
    assert_eq!(packed.len(), 1);

    // least significant slot first, zero slots above the three packed values
    let slots: Vec<Integer> = packer.unpack(&packed[0]).unwrap();
    assert_eq!(slots.len(), 64);
    assert_eq!(slots[0], 130);
    assert_eq!(slots[1], 5);
    assert_eq!(slots[2], 200);
    assert!(slots[3..].iter().all(|x| *x == 0));

    let mut restored: Vec<Integer> = slots;
    restored.reverse();
    let restored: Vec<Integer> = restored.split_off(64 - values.len());
    assert_eq!(restored, values.iter().map(|v| Integer::from(*v)).collect::<Vec<Integer>>());

    assert_eq!(packer.unpack_all(&packed, values.len()).unwrap(), restored);
}

#[test]
fn pack_unpack_multiple_packets() {
    [(64u32, 8u32, 20usize), (64, 8, 16), (128, 10, 37), (256, 31, 9), (256, 2, 300)]
        .iter()
        .for_each(|&(bits, width, count)| {
            println!(
                "test pack_unpack_multiple_packets bits: {} width: {} count: {}",
                bits, width, count
            );
            test_pack_unpack(bits, width, count);
        });
}

fn test_pack_unpack(bits: u32, width: u32, count: usize) {
    let paillier: Paillier = test_paillier(bits, 1);
    let mut source: Source = Source::new([2u8; 32]);
    let packer: Packer = Packer::new(&paillier, width).unwrap();

    // values below 2^(width-1) keep a full packet below n
    let bound: u64 = 1u64 << (width - 1);
    let values: Vec<u64> = (0..count).map(|_| source.random_range(0..bound)).collect();

    let packed: Vec<Ciphertext> = packer.pack(&encrypt_all(&paillier, &values, &mut source)).unwrap();
    assert_eq!(packed.len(), packer.packets(count));

    let have: Vec<Integer> = packer.unpack_all(&packed, count).unwrap();
    assert_eq!(have.len(), count);
    izip!(values.iter(), have.iter()).for_each(|(a, b)| assert_eq!(*b, *a));
}

#[test]
fn packed_addition() {
    let paillier: Paillier = test_paillier(128, 2);
    let mut source: Source = Source::new([3u8; 32]);
    let packer: Packer = Packer::new(&paillier, 16).unwrap();

    let a: Vec<u64> = (0..20).map(|_| source.random_range(0..1000)).collect();
    let b: Vec<u64> = (0..20).map(|_| source.random_range(0..1000)).collect();

    let packed_a: Vec<Ciphertext> = packer.pack(&encrypt_all(&paillier, &a, &mut source)).unwrap();
    let packed_b: Vec<Ciphertext> = packer.pack(&encrypt_all(&paillier, &b, &mut source)).unwrap();
    let packed_sum: Vec<Ciphertext> = izip!(packed_a.iter(), packed_b.iter())
        .map(|(x, y)| paillier.add(x, y).unwrap())
        .collect();

    let have: Vec<Integer> = packer.unpack_all(&packed_sum, a.len()).unwrap();
    izip!(a.iter(), b.iter(), have.iter()).for_each(|(x, y, z)| assert_eq!(*z, x + y));
}

#[test]
fn public_instance_packs() {
    let paillier: Paillier = test_paillier(128, 3);
    let public: Paillier = paillier.to_public();
    let mut source: Source = Source::new([4u8; 32]);

    let values: Vec<u64> = vec![1, 0, 1, 1, 0, 0, 1];
    let cts: Vec<Ciphertext> = encrypt_all(&public, &values, &mut source);
    let packed: Vec<Ciphertext> = Packer::new(&public, 4).unwrap().pack(&cts).unwrap();

    assert_eq!(
        Packer::new(&public, 4).unwrap().unpack(&packed[0]).unwrap_err(),
        Error::MissingPrivateKey
    );
    let have: Vec<Integer> = Packer::new(&paillier, 4)
        .unwrap()
        .unpack_all(&packed, values.len())
        .unwrap();
    izip!(values.iter(), have.iter()).for_each(|(a, b)| assert_eq!(*b, *a));
}

#[test]
fn width_must_fit_modulus() {
    let paillier: Paillier = test_paillier(64, 4);
    [0u32, 64, 65, 1000].iter().for_each(|&width| {
        assert_eq!(
            Packer::new(&paillier, width).err(),
            Some(Error::PackingWidthMismatch {
                width,
                modulus_bits: 64,
            })
        );
    });
    assert_eq!(Packer::new(&paillier, 63).unwrap().slots(), 1);
    assert_eq!(Packer::new(&paillier, 32).unwrap().slots(), 2);
}

#[test]
fn empty_input_packs_to_nothing() {
    let paillier: Paillier = test_paillier(64, 5);
    let packer: Packer = Packer::new(&paillier, 8).unwrap();
    assert!(packer.pack(&[]).unwrap().is_empty());
    assert!(packer.unpack_all(&[], 0).unwrap().is_empty());
    assert_eq!(packer.packets(0), 0);
}
