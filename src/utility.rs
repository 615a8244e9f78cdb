/// This module provides stratified k-fold splitting, which keeps the class
/// proportions of every fold close to those of the whole dataset
pub mod stratified_k_fold;

pub use stratified_k_fold::*;
