// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! Protocol constants forming the external contract of the execution core

mod constants;

pub use constants::*;
