mod native;
mod properties;
