pub mod shared {
    pub mod core {
        pub mod primitives;
    }
    pub mod infrastructure {
        pub mod signature;
    }
}

pub mod modules {
    pub mod purchases {
        pub mod errors;
        pub mod core {
            pub mod notification;
            pub mod purchase;
            pub mod transitions;
        }
        pub mod use_cases {
            pub mod initiate_checkout {
                pub mod command;
                pub mod handler;
                pub mod inbound {
                    pub mod graphql;
                    pub mod http;
                }
            }
            pub mod reconcile_payment {
                pub mod decide;
                pub mod decision;
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod refund_purchase {
                pub mod command;
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod get_purchase_status {
                pub mod handler;
                pub mod inbound {
                    pub mod graphql;
                    pub mod http;
                }
                pub mod projection;
            }
            pub mod list_purchased_courses {
                pub mod handler;
                pub mod inbound {
                    pub mod graphql;
                    pub mod http;
                }
                pub mod projection;
            }
        }
        pub mod adapters {
            pub mod outbound {
                pub mod catalog;
                pub mod catalog_in_memory;
                pub mod enrollment;
                pub mod identity;
                pub mod identity_in_memory;
                pub mod payment_gateway;
                pub mod purchase_ledger;
                pub mod purchase_ledger_in_memory;
                pub mod razorpay_gateway;
                pub mod stripe_gateway;
            }
        }
    }
}

pub mod shell;
