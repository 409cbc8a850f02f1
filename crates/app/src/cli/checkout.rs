use std::io;

use clap::Args;
use tracing::info;

use storefront::shipping::ShippingDetails;
use storefront_app::{
    context::AppContext,
    domain::{checkout::CheckoutError, users::UserId},
};

use super::{render, report, write_failed};

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Recipient name
    #[arg(long, default_value = "")]
    name: String,

    /// Contact and payer e-mail
    #[arg(long, default_value = "")]
    email: String,

    /// Street address
    #[arg(long, default_value = "")]
    address: String,

    /// City
    #[arg(long, default_value = "")]
    city: String,

    /// Postal code
    #[arg(long, default_value = "")]
    postal_code: String,

    /// Contact phone number
    #[arg(long)]
    phone: Option<String>,

    /// Show the priced cart without paying
    #[arg(long)]
    preview: bool,

    /// Simulate the payer cancelling the payment
    #[arg(long)]
    pub(crate) cancel: bool,
}

impl CheckoutArgs {
    fn shipping_details(&self) -> ShippingDetails {
        ShippingDetails {
            name: self.name.clone(),
            email: self.email.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            postal_code: self.postal_code.clone(),
            phone: self.phone.clone(),
        }
    }
}

pub(crate) async fn run(
    ctx: &AppContext,
    user: UserId,
    args: CheckoutArgs,
    out: &mut impl io::Write,
) -> Result<(), String> {
    let session = ctx.checkout_for(user);
    let shipping = args.shipping_details();

    if args.preview {
        let summary = session
            .prepare(&shipping)
            .await
            .map_err(|error| report(&error))?;

        return render::write_summary(out, &summary).map_err(|error| write_failed(&error));
    }

    match session.checkout(shipping).await {
        Ok(order) => render::write_order(out, &order).map_err(|error| write_failed(&error)),
        Err(CheckoutError::InvalidShippingForm(errors)) => Err(errors
            .errors()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")),
        Err(CheckoutError::CartNotCleared { order, source }) => {
            info!(order_uuid = %order.uuid, "order placed with cart left behind");

            render::write_order(out, &order).map_err(|error| write_failed(&error))?;

            Err(format!(
                "order placed, but your cart could not be emptied: {}",
                report(&source)
            ))
        }
        Err(error) => Err(report(&error)),
    }
}
