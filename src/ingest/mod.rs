/// Extractors for the three Water Office payloads. Each file owns one
/// upstream shape; fetching lives in `retrieval`.
pub mod graph_data;
pub mod station_detail;
pub mod station_list;

#[cfg(test)]
pub(crate) mod fixtures;
