// Copyright (c) 2022 MASSA LABS <info@massa.net>


mod scenarios_admission;
mod scenarios_block;
mod scenarios_warp;
