pub(crate) mod authenticated_user;
