pub mod write_series_csv;
