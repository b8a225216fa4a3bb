mod helpers;

mod decode_cascade_test;
mod mfcc_test;
mod pipeline_test;
mod prediction_test;
