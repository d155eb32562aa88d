use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Error occurs while binding TCP server, error: {source}"))]
    BindTcpServer { source: std::io::Error },

    #[snafu(display("Error occurs while serving metrics server, error: {message}"))]
    ServeMetricsServer { message: String },
}
