// Copyright 2026 ndbackend developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use ndbackend::dimension::compute_stride;
use ndbackend::Array;

use num_traits::{Num, NumCast};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Order of the generated elements in the backing buffer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MemoryOrder
{
    /// The first axis varies fastest; the built array is a root array.
    ColumnMajor,
    /// The last axis varies fastest; the built array is a strided view.
    RowMajor,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArrayBuilder
{
    shape: Vec<usize>,
    memory_order: MemoryOrder,
    generator: ElementGenerator,
}

/// How to generate elements
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ElementGenerator
{
    /// 0, 1, 2, ... in memory order
    Sequential,
    Zero,
    /// Uniform in `[-1, 1)` from a seeded generator; for floating point
    /// elements.
    Random(u64),
}

impl Default for ArrayBuilder
{
    fn default() -> Self
    {
        Self::new(&[0])
    }
}

impl ArrayBuilder
{
    pub fn new(shape: &[usize]) -> Self
    {
        ArrayBuilder {
            shape: shape.to_vec(),
            memory_order: MemoryOrder::ColumnMajor,
            generator: ElementGenerator::Sequential,
        }
    }

    pub fn memory_order(mut self, order: MemoryOrder) -> Self
    {
        self.memory_order = order;
        self
    }

    pub fn generator(mut self, generator: ElementGenerator) -> Self
    {
        self.generator = generator;
        self
    }

    fn elements<T>(&self) -> Vec<T>
    where T: Num + NumCast + Clone
    {
        let size = self.shape.iter().product();
        match self.generator {
            ElementGenerator::Zero => vec![T::zero(); size],
            ElementGenerator::Sequential => {
                let mut current = T::zero();
                (0..size)
                    .map(|_| {
                        let ret = current.clone();
                        current = ret.clone() + T::one();
                        ret
                    })
                    .collect()
            }
            ElementGenerator::Random(seed) => {
                let mut rng = SmallRng::seed_from_u64(seed);
                (0..size)
                    .map(|_| <T as NumCast>::from(rng.random_range(-1.0..1.0)).unwrap_or_else(T::zero))
                    .collect()
            }
        }
    }

    pub fn build<T>(self) -> Array<T>
    where T: Num + NumCast + Clone
    {
        let data = self.elements();
        match self.memory_order {
            MemoryOrder::ColumnMajor => Array::from_shape_vec(&self.shape, data).unwrap(),
            MemoryOrder::RowMajor => {
                let mut reversed = self.shape.clone();
                reversed.reverse();
                let mut strides = compute_stride(&reversed);
                strides.reverse();
                let major = self.shape.len().saturating_sub(1);
                Array::from_vec(data)
                    .as_view_major(0, &self.shape, &strides, major)
                    .unwrap()
            }
        }
    }
}

#[test]
fn test_order()
{
    let (m, n) = (12, 13);
    let c = ArrayBuilder::new(&[m, n])
        .memory_order(MemoryOrder::RowMajor)
        .build::<i32>();
    let f = ArrayBuilder::new(&[m, n])
        .memory_order(MemoryOrder::ColumnMajor)
        .build::<i32>();

    assert_eq!(c.shape(), &[m, n]);
    assert_eq!(f.shape(), &[m, n]);
    assert_eq!(c.strides(), &[n as isize, 1]);
    assert_eq!(f.strides(), &[1, m as isize]);
    assert_eq!(c.get(&[0, 1]).unwrap(), 1);
    assert_eq!(f.get(&[1, 0]).unwrap(), 1);
}

#[test]
fn test_random_is_seeded()
{
    let a = ArrayBuilder::new(&[4, 3])
        .generator(ElementGenerator::Random(7))
        .build::<f64>();
    let b = ArrayBuilder::new(&[4, 3])
        .generator(ElementGenerator::Random(7))
        .build::<f64>();
    assert_eq!(a, b);
    assert!(a.iter().all(|x| (-1.0..1.0).contains(&x)));
}
