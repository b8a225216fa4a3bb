mod classifier_factory;
mod conv_net_classifier;
mod feature_scaler;
mod forest_classifier;

pub use classifier_factory::ClassifierFactory;
pub use conv_net_classifier::ConvNetClassifier;
pub use feature_scaler::FeatureScaler;
pub use forest_classifier::ForestClassifier;
