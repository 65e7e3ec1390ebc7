mod mask_tests;
mod region2d_tests;
